use std::process::Command;

fn write_config() -> (std::path::PathBuf, std::path::PathBuf) {
    let dir = std::env::temp_dir().join(format!("helios-cli-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let session_dir = dir.join("session");
    let config_path = dir.join("config.yaml");
    std::fs::write(
        &config_path,
        format!(
            "api_base_url: \"http://127.0.0.1:9\"\nsession_dir: \"{}\"\n",
            session_dir.display()
        ),
    )
    .unwrap();
    (config_path, session_dir)
}

#[test]
fn status_without_token_prints_connect_step() {
    let binary_path = env!("CARGO_BIN_EXE_helios-onboard");
    let (config_path, _) = write_config();

    let output = Command::new(binary_path)
        .arg("--config")
        .arg(&config_path)
        .arg("--log-level")
        .arg("error")
        .arg("status")
        .output()
        .expect("Failed to start helios-onboard binary");

    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("step:     0"), "unexpected output: {stdout}");
}

#[test]
fn logout_removes_token_file() {
    let binary_path = env!("CARGO_BIN_EXE_helios-onboard");
    let (config_path, session_dir) = write_config();
    std::fs::create_dir_all(&session_dir).unwrap();
    let token_file = session_dir.join("helios_auth_token.token");
    std::fs::write(&token_file, "header.payload.signature").unwrap();

    let output = Command::new(binary_path)
        .arg("--config")
        .arg(&config_path)
        .arg("logout")
        .output()
        .expect("Failed to start helios-onboard binary");

    assert!(output.status.success());
    assert!(!token_file.exists());
}
