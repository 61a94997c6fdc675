//! Typed-data command - export the EIP-712 document for external signing

use anyhow::Result;
use epns_lib::signing::{
    action_types, get_domain_information, get_subscription_message, ChannelAction, TypedData,
};
use epns_lib::ClientConfig;

pub fn run(
    config: &ClientConfig,
    channel: &str,
    user: &str,
    chain_id: u64,
    action: ChannelAction,
) -> Result<()> {
    let document = build(config, channel, user, chain_id, action);
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn build(
    config: &ClientConfig,
    channel: &str,
    user: &str,
    chain_id: u64,
    action: ChannelAction,
) -> TypedData {
    let domain = get_domain_information(chain_id, Some(config.communicator_contract.as_str()));
    let message = get_subscription_message(channel, user, action);
    TypedData::new(domain, &action_types(action), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_uses_configured_contract() {
        let config = ClientConfig::default().with_communicator_contract("0xc0ffee");
        let doc = build(&config, "0xchan", "0xuser", 5, ChannelAction::Unsubscribe);
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["domain"]["verifyingContract"], "0xc0ffee");
        assert_eq!(value["domain"]["chainId"], 5);
        assert_eq!(value["primaryType"], "Unsubscribe");
        assert_eq!(value["message"]["unsubscriber"], "0xuser");
        assert!(value["types"]["Unsubscribe"].is_array());
    }
}
