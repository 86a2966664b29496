use std::fs;

use clap::Parser;
use tempfile::TempDir;

use crate::{execute, AppState, Cli};

const CONFIG: &str = r#"
store: web
linkProvider:
  forceFriendlyUrl: true
  trailingSlash: true
  encodeNameReplacements:
    - find: " "
      replaceWith: "-"
sites:
  - name: website
    hostName: www.example.com
    rootPath: /sitecore/content
    startPath: /sitecore/content/Home
  - name: shop
    hostName: shop.example.com
    rootPath: /sitecore/shop
    startPath: /sitecore/shop/Home
"#;

const TREE: &str = r#"
- name: sitecore
  children:
    - name: content
      children:
        - name: Home
          children:
            - name: Products
              children:
                - name: Red Widget
    - name: shop
      children:
        - name: Home
          children:
            - name: Cart
"#;

fn setup_test_state() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("waymark.yaml");
    let tree_path = temp_dir.path().join("tree.yaml");
    fs::write(&config_path, CONFIG).unwrap();
    fs::write(&tree_path, TREE).unwrap();

    let state = AppState::load(Some(&config_path), Some(&tree_path)).unwrap();
    (state, temp_dir)
}

fn run(state: &AppState, args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("waymark").chain(args.iter().copied())).unwrap();
    execute(state, &cli.command)
}

#[test]
fn test_normalize_needs_no_files() {
    let state = AppState::load(None, None).unwrap();
    let output = run(&state, &["normalize", "Widgets & Gadgets!", "Red Widget"]).unwrap();
    assert_eq!(output, "widgets-gadgets-\nred-widget");
}

#[test]
fn test_resolve_command() {
    let (state, _dir) = setup_test_state();

    let output = run(&state, &["resolve", "--site", "website", "/products/red-widget/"]).unwrap();
    assert_eq!(output, "/sitecore/content/Home/Products/Red Widget");

    let err = run(&state, &["resolve", "--site", "website", "/products/blue"]).unwrap_err();
    assert!(err.to_string().contains("unresolved"));

    let err = run(&state, &["resolve", "--site", "nope", "/"]).unwrap_err();
    assert!(err.to_string().contains("unknown site"));
}

#[test]
fn test_url_command() {
    let (state, _dir) = setup_test_state();

    let output = run(
        &state,
        &["url", "--site", "website", "/sitecore/content/Home/Products/Red Widget"],
    )
    .unwrap();
    assert_eq!(output, "/products/red-widget/");

    let output = run(
        &state,
        &[
            "url",
            "--site",
            "website",
            "--secure",
            "--absolute",
            "/sitecore/content/Home/Products",
        ],
    )
    .unwrap();
    assert_eq!(output, "https://www.example.com/products/");

    let output = run(&state, &["url", "--site", "website", "/sitecore/shop/Home/Cart"]).unwrap();
    assert_eq!(output, "http://shop.example.com/cart/");
}

#[test]
fn test_request_command() {
    let (state, _dir) = setup_test_state();

    let output = run(
        &state,
        &["request", "--site", "website", "--query", "a=1", "/Products/Red-Widget"],
    )
    .unwrap();
    assert_eq!(output, "301 /products/red-widget/?a=1");

    let output = run(&state, &["request", "--site", "website", "/products/red-widget/"]).unwrap();
    assert_eq!(output, "200 /sitecore/content/Home/Products/Red Widget");

    let output = run(
        &state,
        &["request", "--site", "website", "--method", "POST", "/Products"],
    )
    .unwrap();
    assert_eq!(output, "200 /sitecore/content/Home/Products (not canonical)");

    let output = run(
        &state,
        &["request", "--site", "website", "--mode", "edit", "/Products"],
    )
    .unwrap();
    assert_eq!(output, "200 /sitecore/content/Home/Products");

    let output = run(&state, &["request", "--site", "website", "/missing"]).unwrap();
    assert_eq!(output, "404");
}

#[test]
fn test_request_command_json() {
    let (state, _dir) = setup_test_state();

    let output = run(
        &state,
        &["request", "--site", "website", "--json", "/Products"],
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["outcome"], "resolvedNonCanonical");
    assert_eq!(value["redirect"]["status"], 301);
    assert_eq!(value["redirect"]["location"], "/products/");
    assert_eq!(value["node"]["name"], "Products");
}

#[test]
fn test_tree_required_for_lookups() {
    let state = AppState::load(None, None).unwrap();
    let err = run(&state, &["resolve", "--site", "website", "/"]).unwrap_err();
    assert!(err.to_string().contains("--tree"));
}

#[test]
fn test_log_level() {
    let (state, _dir) = setup_test_state();
    assert_eq!(state.log_level(true), "debug");
    assert_eq!(state.log_level(false), "warn");
}
