use crate::cli::GlobalArgs;
use color_eyre::Result;
use serde_json::json;
use setcode_core::{parse_address, resolve_nonce};
use setcode_rpc_client::RpcClient;

/// Arguments for the nonce lookup command.
#[derive(clap::Parser, Debug)]
#[clap(
    name = "nonce",
    about = "Look up an account's pending transaction count"
)]
pub struct NonceArgs {
    /// Account to query.
    #[clap(value_name = "ADDRESS")]
    pub address: String,
}

impl NonceArgs {
    pub async fn run(&self, args: &GlobalArgs) -> Result<()> {
        let address = parse_address(&self.address)?;
        let client = RpcClient::new(&args.rpc_url)?;

        // Soft-fails to 0 with a warning, mirroring the nonce pre-fill
        // behavior of the signing flow.
        let nonce = resolve_nonce(&client, address).await;

        if args.json {
            println!("{}", json!({ "address": address, "nonce": nonce }));
        } else {
            println!("{nonce}");
        }
        Ok(())
    }
}
