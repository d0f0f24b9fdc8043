//! End-to-end scenarios through the public API: configuration, direct and
//! indirect dispatch, peer-to-peer boxes, and every failure class.

use cabinet::{
    generate_asymmetric_keypair, generate_symmetric_key, Attachment, CabinetConfig, CabinetError,
    ConfigError, Dispatcher, Registry,
};
use serde_json::json;

fn is_token(s: &str) -> bool {
    match s.split_once('*') {
        Some((body, nonce)) => {
            let lower_hex = |p: &str| p.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
            !body.is_empty() && nonce.len() == 48 && lower_hex(body) && lower_hex(nonce)
        }
        None => false,
    }
}

fn symmetric() -> Dispatcher {
    let key = generate_symmetric_key();
    Dispatcher::new(Registry::build(&CabinetConfig::symmetric(key.key)).unwrap())
}

#[test]
fn hello_token_scenario() {
    let bc = symmetric();
    let token = bc.encrypt("hello").unwrap();
    assert!(is_token(&token), "unexpected token {token}");
    assert_eq!(bc.decrypt(token, None).unwrap().into_string().unwrap(), "hello");
}

#[test]
fn symmetric_object_round_trip() {
    let bc = symmetric();
    let plaintext = json!({ "thisis": "atestobject", "withinteger": 123, "and": { "sub": "objects" } });
    let token = bc.encrypt(plaintext.clone()).unwrap();
    let opened = bc.decrypt(token, None).unwrap();
    assert_eq!(opened.as_str().unwrap(), plaintext.to_string());
}

#[test]
fn asymmetric_peers_exchange_messages() {
    let sender = generate_asymmetric_keypair();
    let receiver = generate_asymmetric_keypair();

    let a = Attachment::from_config(&sender.config_for_peer(&receiver), None).unwrap();
    let b = Attachment::from_config(&receiver.config_for_peer(&sender), Some("un")).unwrap();

    for message in [json!("thisisatestplaintext"), json!({ "nested": { "n": 1 } })] {
        let token = a.dispatcher().encrypt(message.clone()).unwrap();
        let opened = b.dispatcher().decrypt(token.as_str(), None).unwrap();
        let expected = match &message {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        assert_eq!(opened.into_string().unwrap(), expected);
    }
}

#[test]
fn asymmetric_split_ciphertext_and_nonce() {
    let sender = generate_asymmetric_keypair();
    let receiver = generate_asymmetric_keypair();
    let a = Dispatcher::new(Registry::build(&sender.config_for_peer(&receiver)).unwrap());
    let b = Dispatcher::new(Registry::build(&receiver.config_for_peer(&sender)).unwrap());

    let token = a.encrypt("thisisatestplaintext").unwrap();
    let (c, n) = token.split_once('*').unwrap();
    assert_eq!(
        b.decrypt(c, Some(n)).unwrap().as_bytes(),
        b"thisisatestplaintext"
    );
}

#[test]
fn bound_keypair_is_rejected() {
    let k = generate_asymmetric_keypair();
    let err = Registry::build(&CabinetConfig::asymmetric(k.private_key, k.public_key)).unwrap_err();
    assert!(matches!(
        err,
        CabinetError::Configuration(ConfigError::BoundKeypair)
    ));
}

#[test]
fn config_from_json_with_aliases() {
    let peer = generate_asymmetric_keypair();
    let own = generate_asymmetric_keypair();
    let config: CabinetConfig = serde_json::from_value(json!({
        "symmetric": { "key": generate_symmetric_key().key },
        "asymmetric": { "secretKey": own.private_key, "pk": peer.public_key },
    }))
    .unwrap();

    let bc = Dispatcher::new(Registry::build(&config).unwrap());
    assert!(!bc.is_direct());
    assert!(matches!(bc.encrypt("hello"), Err(CabinetError::AmbiguousCabinetType)));

    let token = bc.resolve("asy").unwrap().encrypt("hello").unwrap();
    assert!(is_token(&token));
}

#[test]
fn empty_configuration_is_rejected() {
    let config: CabinetConfig = serde_json::from_value(json!({})).unwrap();
    assert!(matches!(
        Registry::build(&config),
        Err(CabinetError::Configuration(ConfigError::Missing))
    ));
}

#[test]
fn failures_carry_original_messages() {
    let bc = symmetric();
    assert_eq!(
        bc.encrypt("").unwrap_err().to_string(),
        "Unable to operate on an empty message."
    );
    assert_eq!(
        bc.decrypt("", None).unwrap_err().to_string(),
        "Unable to operate on an empty message."
    );
    let token = bc.encrypt("hello").unwrap();
    let (c, _) = token.split_once('*').unwrap();
    assert_eq!(
        bc.decrypt(c, None).unwrap_err().to_string(),
        "Unable to decrypt without nonce."
    );
}

#[test]
fn foreign_cabinet_cannot_open() {
    let token = symmetric().encrypt("hello").unwrap();
    assert!(matches!(
        symmetric().decrypt(token, None),
        Err(CabinetError::CryptoFailure)
    ));
}

#[tokio::test]
async fn concurrent_async_calls_share_one_registry() {
    let bc = symmetric();
    let mut tasks = Vec::new();
    for i in 0..32 {
        let bc = bc.clone();
        tasks.push(tokio::spawn(async move {
            let message = format!("message {i}");
            let token = bc.encrypt_async(message.clone()).await.unwrap();
            let opened = bc.decrypt_async(token, None).await.unwrap();
            assert_eq!(opened.into_string().unwrap(), message);
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
}
