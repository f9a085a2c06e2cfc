use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "dai-site", version, about = "D.A.I site visitor-state tool")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "",
        help = "Page query string; contains admin=1 to raise the admin signal"
    )]
    pub admin_query: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        toggle == Toggle::On
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the current snapshot
    Show,
    Contrast {
        #[arg(value_enum)]
        state: Toggle,
    },
    Motion {
        #[arg(value_enum)]
        state: Toggle,
    },
    FontBigger,
    FontSmaller,
    /// Restore default accessibility settings
    Reset,
    /// Acknowledge the photosensitivity warning
    Ack {
        #[arg(long, default_value_t = false)]
        reduce_motion: bool,
    },
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        avatar: Option<String>,
    },
    Approve {
        index: usize,
    },
    Reject {
        index: usize,
    },
    /// Print the rendered <body> attributes
    Body,
}
