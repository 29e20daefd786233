use clap::Parser;

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable detailed debug logging (global)
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Enable verbose logging (global)
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Directory and file busting mode
    Dir {
        /// Target URL to scan for directories
        #[arg(short = 'u', long)]
        url: String,

        /// Path to the wordlist file
        #[arg(short = 'w', long)]
        wordlist: String,

        /// Comma-separated list of file extensions to try (e.g. .php,.db,.txt,.js)
        #[arg(short = 'e', long)]
        extensions: Option<String>,

        /// Number of concurrent workers
        #[arg(short = 't', long, default_value_t = 10)]
        threads: usize,

        /// Path to save results as a JSON file
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Subdomain enumeration mode
    Sub {
        /// Target domain to enumerate subdomains
        #[arg(short = 'd', long)]
        domain: String,

        /// Path to the wordlist file
        #[arg(short = 'w', long)]
        wordlist: String,

        /// Number of concurrent workers
        #[arg(short = 't', long, default_value_t = 10)]
        threads: usize,

        /// Path to save results as a JSON file
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Query-parameter fuzzing mode
    Fuzz {
        /// Target URL with the FUZZ token in its query string (e.g. https://example.com/page.php?id=FUZZ)
        #[arg(short = 'u', long)]
        url: String,

        /// Parameter name being fuzzed (e.g. id)
        #[arg(short = 'p', long)]
        param: String,

        /// Path to the wordlist file
        #[arg(short = 'w', long)]
        wordlist: String,

        /// Number of concurrent workers
        #[arg(short = 't', long, default_value_t = 10)]
        threads: usize,

        /// Path to save results as a JSON file
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Fuzz every FUZZ token anywhere in the URL
    Fuzzany {
        /// URL with one or more FUZZ placeholders
        #[arg(short = 'u', long)]
        url: String,

        /// Path to the wordlist file
        #[arg(short = 'w', long)]
        wordlist: String,

        /// Number of concurrent workers
        #[arg(short = 't', long, default_value_t = 10)]
        threads: usize,

        /// Path to save results as a JSON file
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Virtual host brute-forcing mode
    Vhost {
        /// IP address of the target server
        #[arg(short = 'i', long)]
        ip: String,

        /// Original base domain
        #[arg(short = 'd', long)]
        domain: String,

        /// Path to the wordlist file
        #[arg(short = 'w', long)]
        wordlist: String,

        /// Number of concurrent workers
        #[arg(short = 't', long, default_value_t = 10)]
        threads: usize,

        /// Path to save results as a JSON file
        #[arg(short = 'o', long)]
        output: Option<String>,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
