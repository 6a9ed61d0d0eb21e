use clap::Parser;

#[derive(Parser)]
#[command(name = "sub-import")]
#[command(about = "Copy English subtitles next to media imported by Radarr or Sonarr")]
#[command(version)]
pub struct Cli {
    /// Log debug detail to stdout in addition to the info lines on stderr
    #[arg(long)]
    pub verbose: bool,

    /// Report what would be copied without writing anything
    #[arg(long)]
    pub dry_run: bool,
}
