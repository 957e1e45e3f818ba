use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use shopflow::config::Config;
use shopflow::driver::{Browser, WebDriverBrowser};
use shopflow::flows::{storefront_suite, StorefrontData};
use shopflow::harness::run_session;
use shopflow::report::{format_run_label, load_all_runs, render_dashboard, DashboardMode, RunId};
use shopflow::session::{list_runs, DASHBOARD_FILE};

/// Shopflow - storefront UI testing with run dashboards
#[derive(Parser, Debug)]
#[command(
    name = "shopflow",
    about = "End-to-end storefront UI testing with WebDriver page objects and HTML run dashboards",
    after_help = "ENVIRONMENT VARIABLES:\n\
        SHOPFLOW_BASE_URL              Storefront base URL\n\
        SHOPFLOW_BASIC_AUTH_USER       HTTP basic auth user\n\
        SHOPFLOW_BASIC_AUTH_PASSWORD   HTTP basic auth password\n\
        SHOPFLOW_WEBDRIVER_URL         WebDriver endpoint URL\n\
        SHOPFLOW_HEADLESS              Run the browser headless (true/false)\n\
        SHOPFLOW_TIMEOUT               Element wait timeout in seconds\n\
        SHOPFLOW_WINDOW_SIZE           Window size preset or WxH\n\
        SHOPFLOW_REPORTS_DIR           Reports tree root\n\
        SHOPFLOW_DASHBOARD_TITLE       Dashboard page title\n\
        SHOPFLOW_LOGO                  Logo file staged into dashboard assets\n\
        SHOPFLOW_COUPON_CODE           Coupon code for the balance flow\n\
        SHOPFLOW_VOUCHER_AMOUNT        Voucher amount for the purchase flow"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the storefront suite and write run reports
    Run {
        /// Storefront base URL (overrides SHOPFLOW_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,

        /// WebDriver endpoint URL (overrides SHOPFLOW_WEBDRIVER_URL)
        #[arg(long)]
        webdriver_url: Option<String>,

        /// Run with a visible browser window
        #[arg(long)]
        headed: bool,

        /// Reports tree root (overrides SHOPFLOW_REPORTS_DIR)
        #[arg(short, long)]
        reports_dir: Option<String>,
    },

    /// Rebuild the aggregate dashboard from persisted runs
    Report {
        /// Run id to pre-select (default: newest on disk)
        #[arg(long)]
        select: Option<String>,

        /// Reports tree root (overrides SHOPFLOW_REPORTS_DIR)
        #[arg(short, long)]
        reports_dir: Option<String>,
    },

    /// List persisted runs, newest first
    Runs {
        /// Reports tree root (overrides SHOPFLOW_REPORTS_DIR)
        #[arg(short, long)]
        reports_dir: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command {
        Some(Commands::Run {
            base_url,
            webdriver_url,
            headed,
            reports_dir,
        }) => {
            let mut config = Config::from_env();
            if let Some(url) = base_url {
                config.site.base_url = url;
            }
            if let Some(url) = webdriver_url {
                config.driver.webdriver_url = url;
            }
            if headed {
                config.driver.headless = false;
            }
            if let Some(dir) = reports_dir {
                config.reports.reports_dir = dir;
            }

            let data = StorefrontData::from_env();
            let suite = storefront_suite(&config.site, &data);

            let summary = run_session(&config, &suite, || {
                WebDriverBrowser::start(&config.driver).map(|b| Box::new(b) as Box<dyn Browser>)
            })?;

            println!();
            println!(
                "Run {} finished: {}/{} passed ({:.0}%)",
                summary.run_id,
                summary.passed,
                summary.total,
                summary.pass_rate()
            );
            if !summary.all_passed() {
                std::process::exit(1);
            }
        }

        Some(Commands::Report { select, reports_dir }) => {
            let config = Config::from_env();
            let reports_dir =
                PathBuf::from(reports_dir.unwrap_or(config.reports.reports_dir.clone()));

            let all = load_all_runs(&reports_dir);
            if all.is_empty() {
                println!("No runs found under {}", reports_dir.display());
                return Ok(());
            }

            let selected = match select {
                Some(name) => {
                    let id = RunId::from_name(name);
                    if !all.contains_key(&id) {
                        eprintln!("Warning: run {} not found, selector will show newest", id);
                    }
                    id
                }
                None => match all.keys().next_back() {
                    Some(id) => id.clone(),
                    None => return Ok(()),
                },
            };

            let html = render_dashboard(
                &all,
                &selected,
                DashboardMode::Root,
                &config.reports.dashboard_title,
            )?;
            let path = reports_dir.join(DASHBOARD_FILE);
            fs::write(&path, html)?;
            println!("Dashboard rebuilt at {} ({} runs)", path.display(), all.len());
        }

        Some(Commands::Runs { reports_dir }) => {
            let config = Config::from_env();
            let reports_dir =
                PathBuf::from(reports_dir.unwrap_or(config.reports.reports_dir.clone()));

            let runs = list_runs(&reports_dir)?;
            if runs.is_empty() {
                println!("No runs found under {}", reports_dir.display());
                return Ok(());
            }

            let all = load_all_runs(&reports_dir);
            for id in runs {
                match all.get(&id) {
                    Some(tests) => println!("  {}", format_run_label(&id, tests)),
                    None => println!("  {} (no run data)", id),
                }
            }
        }

        None => {
            println!("Shopflow - storefront UI testing with run dashboards");
            println!();
            println!("Usage: shopflow <COMMAND>");
            println!();
            println!("Commands:");
            println!("  run     Run the storefront suite and write run reports");
            println!("  report  Rebuild the aggregate dashboard from persisted runs");
            println!("  runs    List persisted runs, newest first");
            println!();
            println!("Run with --help for more information.");
        }
    }

    Ok(())
}
