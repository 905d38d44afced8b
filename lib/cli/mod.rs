use clap::Parser;

#[derive(Parser, Debug)]
#[clap(about = "Chat backend for focusbot")]
pub struct Cli {
    #[clap(short, long)]
    /// Override the HTTP listen port (default 8000)
    pub port: Option<u16>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
