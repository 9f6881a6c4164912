use crate::cli::{
    GlobalArgs, fee_params, parse_authorizations, parse_ether_value, parse_signer,
};
use color_eyre::{Result, eyre::bail};
use serde_json::json;
use setcode_core::{
    AuthorizationEntry, SubmitOutcome, TransactionDraft, assemble, parse_address, parse_calldata,
    submit,
};
use setcode_rpc_client::{NodeBroadcaster, RpcClient, WalletBroadcaster};

/// Arguments for assembling and broadcasting an EIP-7702 transaction.
#[derive(clap::Parser, Debug)]
#[clap(
    name = "send",
    about = "Assemble and broadcast an EIP-7702 transaction",
    after_help = "EXAMPLES:\n    \
                  Dry-run to inspect the assembled transaction JSON:\n        \
                  setcode send --to 0xabc... --auth @signed.json --from 0xdef... --dry-run\n\n    \
                  Sign and submit raw with an executor key:\n        \
                  setcode send --to 0xabc... --auth @signed.json --raw --private-key $KEY"
)]
pub struct SendArgs {
    /// Executing account; derived from the private key when omitted.
    #[clap(long, value_name = "ADDRESS")]
    pub from: Option<String>,

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
    /// Repeatable; at least one is required.
    #[clap(long = "auth", value_name = "TUPLE", required = true)]
    pub authorizations: Vec<String>,

    /// Transaction nonce override. Independent from authorization nonces;
    /// resolved by the broadcaster when omitted.
    #[clap(long, value_name = "NONCE")]
    pub nonce: Option<u64>,

    /// Explicit gas limit; skips estimation.
    #[clap(long, value_name = "GAS")]
    pub gas_limit: Option<u64>,

    /// Explicit max fee, in gwei.
    #[clap(long, value_name = "GWEI")]
    pub max_fee_per_gas: Option<String>,

    /// Explicit priority fee, in gwei.
    #[clap(long, value_name = "GWEI")]
    pub max_priority_fee_per_gas: Option<String>,

    /// Sign the envelope locally with the executor key and submit it raw,
    /// instead of handing an unsigned object to the node.
    #[clap(long)]
    pub raw: bool,

    /// Hex-encoded private key of the executor account.
    #[clap(
        long = "private-key",
        env = "SETCODE_PRIVATE_KEY",
        hide_env_values = true,
        value_name = "KEY"
    )]
    pub private_key: Option<String>,

    /// Print the assembled transaction JSON instead of broadcasting.
    #[clap(long)]
    pub dry_run: bool,
}

impl SendArgs {
    pub async fn run(&self, args: &GlobalArgs) -> Result<()> {
        let signer = self.private_key.as_deref().map(parse_signer).transpose()?;
        let from = match (&self.from, &signer) {
            (Some(from), _) => parse_address(from)?,
            (None, Some(signer)) => signer.address(),
            (None, None) => bail!("either --from or --private-key is required"),
        };
        if self.raw && signer.is_none() {
            bail!("--raw needs --private-key to sign the envelope");
        }

        let entries = parse_authorizations(&self.authorizations)?
            .into_iter()
            .map(AuthorizationEntry::from_signed)
            .collect::<Result<Vec<_>, _>>()?;

        let draft = TransactionDraft {
            from,
            to: parse_address(&self.to)?,
            value: parse_ether_value(&self.value)?,
            data: parse_calldata(&self.data)?,
            nonce: self.nonce,
        };
        let params = fee_params(
            self.gas_limit,
            self.max_fee_per_gas.as_deref(),
            self.max_priority_fee_per_gas.as_deref(),
        )?;

        let reader = RpcClient::new(&args.rpc_url)?;
        let request = assemble(&reader, draft, &entries, params).await?;

        if self.dry_run {
            println!("{}", serde_json::to_string_pretty(&request)?);
            return Ok(());
        }

        let client = RpcClient::new(&args.rpc_url)?;
        let outcome = match signer {
            Some(signer) if self.raw => {
                submit(&WalletBroadcaster::new(client, signer), &request).await?
            }
            _ => submit(&NodeBroadcaster::new(client), &request).await?,
        };

        match outcome {
            SubmitOutcome::Sent(hash) => {
                if args.json {
                    println!("{}", json!({ "status": "sent", "hash": hash }));
                } else {
                    println!("sent: {hash}");
                }
            }
            SubmitOutcome::Cancelled => {
                if args.json {
                    println!("{}", json!({ "status": "cancelled" }));
                } else {
                    println!("transaction cancelled");
                }
            }
        }
        Ok(())
    }
}
