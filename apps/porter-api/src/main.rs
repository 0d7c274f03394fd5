use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = porter_api::Args::parse();

	porter_api::run(args).await
}
