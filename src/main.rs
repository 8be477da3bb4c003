use anyhow::Result;

fn main() -> Result<()> {
    merpcr_rs::cli::run()
}
