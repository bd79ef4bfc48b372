use actparse::cli::{App, Args, Config};
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();
    let config = Config::load(args.config.clone())?;
    let mut app = App::new(config);

    app.run(args).await?;

    Ok(())
}
