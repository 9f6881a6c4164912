use crate::cli::{GlobalArgs, fee_params, parse_authorizations, parse_ether_value};
use color_eyre::Result;
use serde_json::json;
use setcode_core::{CallRequest, estimate_fees, parse_address, parse_calldata};
use setcode_rpc_client::RpcClient;

/// Arguments for the fee estimation command.
#[derive(clap::Parser, Debug)]
#[clap(
    name = "fees",
    about = "Estimate gas and derive fee parameters for a pending call"
)]
pub struct FeesArgs {
    /// Executing account.
    #[clap(long, value_name = "ADDRESS")]
    pub from: String,

    /// Recipient of the call.
    #[clap(long, value_name = "ADDRESS")]
    pub to: String,

    /// Amount in ether.
    #[clap(long, default_value = "0", value_name = "ETH")]
    pub value: String,

    /// Calldata hex.
    #[clap(long, default_value = "0x", value_name = "HEX")]
    pub data: String,

    /// Signed authorization tuple (inline JSON, or @path to a file).
    /// Repeatable; included so estimation prices the delegated call.
    #[clap(long = "auth", value_name = "TUPLE")]
    pub authorizations: Vec<String>,

    /// Explicit gas limit; skips estimation.
    #[clap(long, value_name = "GAS")]
    pub gas_limit: Option<u64>,

    /// Explicit max fee, in gwei.
    #[clap(long, value_name = "GWEI")]
    pub max_fee_per_gas: Option<String>,

    /// Explicit priority fee, in gwei.
    #[clap(long, value_name = "GWEI")]
    pub max_priority_fee_per_gas: Option<String>,
}

impl FeesArgs {
    pub async fn run(&self, args: &GlobalArgs) -> Result<()> {
        let call = CallRequest {
            from: parse_address(&self.from)?,
            to: parse_address(&self.to)?,
            value: parse_ether_value(&self.value)?,
            data: parse_calldata(&self.data)?,
            authorization_list: parse_authorizations(&self.authorizations)?,
        };
        let params = fee_params(
            self.gas_limit,
            self.max_fee_per_gas.as_deref(),
            self.max_priority_fee_per_gas.as_deref(),
        )?;

        let client = RpcClient::new(&args.rpc_url)?;
        let settings = estimate_fees(&client, &call, &params).await?;

        if args.json {
            println!(
                "{}",
                json!({
                    "gasLimit": settings.gas_limit,
                    "maxFeePerGas": settings.max_fee_per_gas,
                    "maxPriorityFeePerGas": settings.max_priority_fee_per_gas,
                })
            );
        } else {
            println!("gas limit:    {}", settings.gas_limit);
            println!(
                "max fee:      {} gwei",
                settings.max_fee_per_gas as f64 / 1e9
            );
            println!(
                "priority fee: {} gwei",
                settings.max_priority_fee_per_gas as f64 / 1e9
            );
        }
        Ok(())
    }
}
