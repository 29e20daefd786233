use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands};
use reconhound::probe::HIT_STATUS_CODES;
use reconhound::session::{Session, SessionState};
use reconhound::target::TargetDescriptor;
use reconhound::wordlist::load_wordlist;

fn print_banner(session: &Session, wordlist: &str) {
    let descriptor = session.descriptor();
    let mode = descriptor.mode();
    println!("===============================================================");
    println!(" ReconHound on {} mode", mode.as_str());
    println!("===============================================================");
    println!("[+] Target:         {}", descriptor.describe());
    println!("[+] Wordlist:       {wordlist}");
    println!("[+] Threads:        {}", session.threads());
    match descriptor {
        TargetDescriptor::Directory { extensions, .. } if !extensions.is_empty() => {
            println!("[+] Extensions:     {}", extensions.join(","));
        }
        TargetDescriptor::ParamFuzz { param, .. } => {
            println!("[+] Parameter:      {param}");
        }
        TargetDescriptor::PlaceholderFuzz { .. } => {
            println!("[+] Fuzzing all 'FUZZ' tokens in URL");
        }
        TargetDescriptor::Vhost { ip, base_domain } => {
            println!("[+] Base Domain:    {base_domain}");
            println!("[+] IP Address:     {ip}");
        }
        _ => {}
    }
    let codes: Vec<String> = HIT_STATUS_CODES.iter().map(|c| c.to_string()).collect();
    println!("[+] Status codes:   {}", codes.join(","));
    println!("===============================================================\n");
}

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    // Configure logging from the global flags. External crates stay at
    // INFO so reqwest/hyper don't flood the CLI in debug mode.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    let filter_str = format!(
        "reconhound={level},reqwest=info,hyper=info,hickory_resolver=info",
        level = crate_level
    );
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_target(false)
        .init();

    let (descriptor, wordlist, threads, output) = match cli.command {
        Commands::Dir {
            url,
            wordlist,
            extensions,
            threads,
            output,
        } => (
            TargetDescriptor::directory(&url, extensions.as_deref())?,
            wordlist,
            threads,
            output,
        ),
        Commands::Sub {
            domain,
            wordlist,
            threads,
            output,
        } => (TargetDescriptor::subdomain(&domain), wordlist, threads, output),
        Commands::Fuzz {
            url,
            param,
            wordlist,
            threads,
            output,
        } => (
            TargetDescriptor::param_fuzz(&url, &param)?,
            wordlist,
            threads,
            output,
        ),
        Commands::Fuzzany {
            url,
            wordlist,
            threads,
            output,
        } => (
            TargetDescriptor::placeholder_fuzz(&url)?,
            wordlist,
            threads,
            output,
        ),
        Commands::Vhost {
            ip,
            domain,
            wordlist,
            threads,
            output,
        } => (
            TargetDescriptor::vhost(&ip, &domain),
            wordlist,
            threads,
            output,
        ),
    };

    // Fatal before any probing: a bad wordlist means no partial run.
    let words = load_wordlist(Path::new(&wordlist))?;

    let mut session = Session::prepare(descriptor, threads, output.map(PathBuf::from)).await?;
    print_banner(&session, &wordlist);

    // Interrupt listener: flip the shared flag and let the dispatcher
    // drain. In-flight probes finish (or time out) on their own; only
    // future task starts are suppressed.
    let ctx = session.context();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n[!] Received interrupt signal. Shutting down...");
            ctx.cancel();
        }
    });

    let report = session.run(words).await;

    if report.state == SessionState::Interrupted {
        session.flush(true);
        std::process::exit(130);
    }

    session.flush(false);
    println!("\n[+] Scan completed!");
    println!("[+] Total paths found: {}", report.paths);
    println!("[+] Total subdomains found: {}", report.subdomains);
    println!("[+] Total virtual hosts found: {}", report.vhosts);
    println!("[+] Duration: {:.2} seconds", report.elapsed.as_secs_f64());
    Ok(())
}
