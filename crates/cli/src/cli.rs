use crate::{fees::FeesArgs, nonce::NonceArgs, send::SendArgs, sign::SignArgs};
use alloy_primitives::{
    U256,
    utils::{parse_ether, parse_units},
};
use alloy_signer_local::PrivateKeySigner;
use clap::{Parser, ValueHint};
use color_eyre::{
    Result,
    eyre::{WrapErr, bail, eyre},
};
use setcode_core::{FeeParams, SignedAuthorization};

#[derive(Parser)]
#[command(
    name = "setcode",
    version,
    about = "Build, sign, and broadcast EIP-7702 set-code transactions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    #[command(flatten)]
    pub args: GlobalArgs,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    #[command(name = "nonce")]
    Nonce(NonceArgs),
    #[command(name = "sign")]
    Sign(SignArgs),
    #[command(name = "fees")]
    Fees(FeesArgs),
    #[command(name = "send")]
    Send(SendArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// JSON-RPC endpoint to talk to.
    #[clap(
        long = "rpc-url",
        env = "SETCODE_RPC_URL",
        value_hint = ValueHint::Url,
        value_name = "URL",
        global = true,
        default_value = "https://ethereum-sepolia-rpc.publicnode.com"
    )]
    pub rpc_url: String,

    /// Emit machine-readable JSON output.
    #[clap(long, global = true)]
    pub json: bool,
}

/// Parses a hex private key without ever echoing it back in the error.
pub(crate) fn parse_signer(private_key: &str) -> Result<PrivateKeySigner> {
    private_key
        .trim()
        .parse()
        .map_err(|_| eyre!("private key is not a valid 32-byte hex scalar"))
}

/// Parses an ether amount ("0.01") into wei.
pub(crate) fn parse_ether_value(amount: &str) -> Result<U256> {
    parse_ether(amount.trim()).wrap_err_with(|| format!("invalid ether amount '{amount}'"))
}

/// Parses a gwei amount ("1.5") into wei.
pub(crate) fn parse_gwei(amount: &str) -> Result<u128> {
    let parsed = parse_units(amount.trim(), "gwei")
        .wrap_err_with(|| format!("invalid gwei amount '{amount}'"))?;
    Ok(parsed.get_absolute().to::<u128>())
}

pub(crate) fn fee_params(
    gas_limit: Option<u64>,
    max_fee_per_gas: Option<&str>,
    max_priority_fee_per_gas: Option<&str>,
) -> Result<FeeParams> {
    Ok(FeeParams {
        gas_limit,
        max_fee_per_gas: max_fee_per_gas.map(parse_gwei).transpose()?,
        max_priority_fee_per_gas: max_priority_fee_per_gas.map(parse_gwei).transpose()?,
    })
}

/// Parses `--auth` values: inline JSON tuples, or `@path` to a file holding
/// one.
pub(crate) fn parse_authorizations(inputs: &[String]) -> Result<Vec<SignedAuthorization>> {
    inputs
        .iter()
        .map(|input| {
            let raw = match input.strip_prefix('@') {
                Some(path) => std::fs::read_to_string(path)
                    .wrap_err_with(|| format!("reading authorization file {path}"))?,
                None => input.clone(),
            };
            let authorization: SignedAuthorization = serde_json::from_str(&raw)
                .wrap_err("authorization is not a signed {address, chainId, nonce, r, s, yParity} tuple")?;
            if authorization.y_parity > 1 {
                bail!("authorization yParity must be 0 or 1");
            }
            Ok(authorization)
        })
        .collect()
}
