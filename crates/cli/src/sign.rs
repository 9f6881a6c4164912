use crate::cli::{GlobalArgs, parse_signer};
use color_eyre::{Result, eyre::WrapErr};
use setcode_core::{ChainReader, DelegationSession, parse_address};
use setcode_rpc_client::RpcClient;

/// Arguments for signing a delegation authorization.
#[derive(clap::Parser, Debug)]
#[clap(
    name = "sign",
    about = "Sign an EIP-7702 authorization with a private key",
    after_help = "EXAMPLES:\n    \
                  Sign with the nonce resolved from the chain:\n        \
                  setcode sign --contract 0x63c0c19a282a1b52b07dd5a65b58948a07dae32b --private-key $KEY\n\n    \
                  Pin the authorization nonce explicitly:\n        \
                  setcode sign --contract 0x63c0... --nonce 7 --private-key $KEY"
)]
pub struct SignArgs {
    /// Contract the authority delegates its code execution to.
    #[clap(long, value_name = "ADDRESS")]
    pub contract: String,

    /// Authorization nonce; resolved from the chain when omitted.
    #[clap(long, value_name = "NONCE")]
    pub nonce: Option<u64>,

    /// Hex-encoded private key of the authority.
    #[clap(
        long = "private-key",
        env = "SETCODE_PRIVATE_KEY",
        hide_env_values = true,
        value_name = "KEY"
    )]
    pub private_key: String,
}

impl SignArgs {
    pub async fn run(&self, args: &GlobalArgs) -> Result<()> {
        let signer = parse_signer(&self.private_key)?;
        let contract = parse_address(&self.contract)?;

        let client = RpcClient::new(&args.rpc_url)?;
        let chain_id = client.chain_id().await?;

        let mut session = DelegationSession::new(chain_id);
        session.set_contract_address(0, contract)?;
        match self.nonce {
            Some(nonce) => session.set_nonce(0, nonce)?,
            None => {
                session.prefill_nonce(0, &client, signer.address()).await?;
            }
        }

        let signed = session.sign(0, &signer).await?;
        let authority = signed
            .recover_authority()
            .wrap_err("signed authorization failed verification")?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&signed)?);
        } else {
            println!("authority: {authority}");
            println!("contract:  {}", signed.address);
            println!("chain id:  {}", signed.chain_id);
            println!("nonce:     {}", signed.nonce);
            println!(
                "signature: {}",
                session.entry(0)?.packed_signature().unwrap_or_default()
            );
            println!("tuple:     {}", serde_json::to_string(&signed)?);
        }
        Ok(())
    }
}
