use assert_cmd::Command;

#[test]
fn openapi_prints_every_collection() {
    let output = Command::cargo_bin("catalog")
        .unwrap()
        .arg("openapi")
        .output()
        .unwrap();
    assert!(output.status.success());

    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    for path in ["/v1/books", "/v1/authors/{id}", "/v1/publishers", "/healthz"] {
        assert!(document["paths"][path].is_object(), "{path}");
    }
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("catalog")
        .unwrap()
        .arg("shelve")
        .assert()
        .failure();
}
