mod commands;
mod session_file;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// QR payload form for the encode subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PayloadForm {
    Json,
    Url,
}

/// Regulator audit decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum DecisionArg {
    Accept,
    Reject,
}

/// FPI product-authenticity client.
#[derive(Parser)]
#[command(
    name = "fpi",
    version,
    about = "Client for the Fake Product Identification backend"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Backend API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Session file path (default: $FPI_SESSION_FILE, else ~/.fpi-session.json)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a product reference as a QR payload
    Encode {
        /// Product identifier
        product_id: String,
        /// Current state hash
        state_hash: String,
        /// Payload form (json is canonical; url embeds a scan-page link)
        #[arg(long, default_value = "json", value_enum)]
        form: PayloadForm,
        /// Scan-page base URL (required for --form url)
        #[arg(long)]
        scan_base: Option<String>,
    },

    /// Decode a QR payload to its product reference
    Decode {
        /// Payload string (JSON or URL form); read from stdin when omitted
        payload: Option<String>,
    },

    /// Verify a product against the backend scan endpoint
    Scan {
        /// QR payload; alternative to --product-id/--state-hash
        payload: Option<String>,
        #[arg(long)]
        product_id: Option<String>,
        #[arg(long)]
        state_hash: Option<String>,
    },

    /// Log in and cache the session
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account with a role and log in
    Signup {
        email: String,
        #[arg(long)]
        password: String,
        /// manufacturer, seller, regulator, or customer
        #[arg(long)]
        role: String,
    },

    /// Drop the cached session
    Logout,

    /// Show the current session
    Whoami {
        /// Ask the backend instead of reading the cached session
        #[arg(long)]
        remote: bool,
    },

    /// List products visible to the logged-in user
    Products,

    /// Record a regulator audit decision
    Audit {
        /// Product code
        code: String,
        #[arg(long, value_enum)]
        decision: DecisionArg,
    },

    /// Register a product and print its first QR payload
    Register {
        /// Product name
        name: String,
        #[arg(long)]
        batch: Option<String>,
        #[arg(long)]
        brand: Option<String>,
    },

    /// Transfer ownership and print the refreshed QR payload
    Transfer {
        /// Product code
        code: String,
        /// Recipient account
        #[arg(long)]
        to: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let ctx = commands::Context {
        output: cli.output,
        base_url: cli.base_url,
        session_path: cli
            .session_file
            .unwrap_or_else(session_file::default_path),
    };

    let code = match cli.command {
        Commands::Encode {
            product_id,
            state_hash,
            form,
            scan_base,
        } => commands::encode::run(
            ctx.output,
            &product_id,
            &state_hash,
            form,
            scan_base.as_deref(),
        ),
        Commands::Decode { payload } => commands::decode::run(ctx.output, payload.as_deref()),
        Commands::Scan {
            payload,
            product_id,
            state_hash,
        } => commands::scan::run(
            &ctx,
            payload.as_deref(),
            product_id.as_deref(),
            state_hash.as_deref(),
        ),
        Commands::Login { email, password } => commands::auth::run_login(&ctx, &email, &password),
        Commands::Signup {
            email,
            password,
            role,
        } => commands::auth::run_signup(&ctx, &email, &password, &role),
        Commands::Logout => commands::auth::run_logout(&ctx),
        Commands::Whoami { remote } => commands::auth::run_whoami(&ctx, remote),
        Commands::Products => commands::products::run_products(&ctx),
        Commands::Audit { code, decision } => commands::products::run_audit(&ctx, &code, decision),
        Commands::Register { name, batch, brand } => {
            commands::lifecycle::run_register(&ctx, &name, batch, brand)
        }
        Commands::Transfer { code, to } => commands::lifecycle::run_transfer(&ctx, &code, &to),
    };

    process::exit(code);
}
