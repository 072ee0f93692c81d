//! Integration tests against a running catalog backend.
//!
//! These tests need a reachable backend and a valid access token and are
//! ignored by default. To run them, create a `.env` file in the
//! hubtree-lib directory with:
//!
//! ```env
//! HUBTREE_URL=http://localhost:8080
//! HUBTREE_TOKEN=your-access-token
//! ```
//!
//! Then run: `cargo test -p hubtree-lib -- --ignored`

use std::env;
use std::sync::Arc;

use hubtree_lib::CatalogClient;
use hubtree_lib::DataSource;
use hubtree_lib::ExpansionController;
use hubtree_lib::SelectionEmitter;
use hubtree_lib::ToggleOutcome;
use hubtree_lib::auth::StaticTokenProvider;
use hubtree_lib::store::RootState;

fn load_env() -> Option<(String, String)> {
    let _ = dotenvy::dotenv();

    let url = env::var("HUBTREE_URL").ok()?;
    let token = env::var("HUBTREE_TOKEN").ok()?;

    Some((url, token))
}

fn client() -> CatalogClient {
    let (url, token) =
        load_env().expect("Missing required environment variables. See module docs.");
    CatalogClient::builder()
        .url(url)
        .token_provider(StaticTokenProvider::new(token))
        .build()
}

#[tokio::test]
#[ignore = "requires a backend and token in .env file"]
async fn test_fetch_hubs() {
    let hubs = client().fetch_hubs().await.expect("fetch_hubs failed");

    println!("Found {} hubs", hubs.len());
    for hub in &hubs {
        println!("  {} ({})", hub.attributes.name, hub.id);
    }
}

#[tokio::test]
#[ignore = "requires a backend and token in .env file"]
async fn test_expand_first_hub_twice() {
    let browser = ExpansionController::open(Arc::new(client()), SelectionEmitter::new()).await;
    assert_eq!(browser.root_state(), RootState::Ready, "hub fetch failed");

    let Some(&hub) = browser.roots().unwrap().first() else {
        println!("No hubs visible to this token, skipping");
        return;
    };

    let first = browser.toggle(hub).await.unwrap();
    assert!(
        matches!(first, ToggleOutcome::Expanded { fetched: true }),
        "unexpected outcome: {:?}",
        first
    );

    browser.toggle(hub).await.unwrap();
    let again = browser.toggle(hub).await.unwrap();
    assert_eq!(again, ToggleOutcome::Expanded { fetched: false });

    println!(
        "Hub has {} projects",
        browser.node(hub).unwrap().children.ids().len()
    );
}

#[tokio::test]
#[ignore = "requires a backend in .env file"]
async fn test_invalid_token_is_permanent() {
    let (url, _) = load_env().expect("Missing required environment variables. See module docs.");
    let client = CatalogClient::builder()
        .url(url)
        .token_provider(StaticTokenProvider::new("invalid-token"))
        .build();

    let result = client.fetch_hubs().await;

    assert!(result.is_err(), "Should fail with an invalid token");
    let err = result.unwrap_err();
    assert!(!err.is_transient(), "Auth rejection should be permanent: {}", err);
}
