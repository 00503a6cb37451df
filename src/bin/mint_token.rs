//! Mint a bearer token for local testing, signed with the configured
//! JWT_SECRET. In deployments tokens come from the login service; this is
//! for exercising the protected routes by hand.

use clap::Parser;

use plantcare_api::auth::{generate_jwt, Claims};

#[derive(Parser)]
#[command(name = "mint-token")]
#[command(about = "Mint a signed bearer token for local testing")]
#[command(version)]
struct Cli {
    /// Owner identity the token acts as
    #[arg(long)]
    id: String,

    #[arg(long)]
    email: String,

    #[arg(long, default_value = "user")]
    role: String,
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let token = generate_jwt(Claims::new(cli.id, cli.email, cli.role))?;
    println!("{}", token);
    Ok(())
}
