use std::process::{Command, Output};

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_PHONE: &str = "13800000000";

fn aizhong_binary() -> &'static str {
    env!("CARGO_BIN_EXE_aizhong")
}

fn run_aizhong(args: &[&str]) -> Output {
    Command::new(aizhong_binary())
        .args(args)
        .output()
        .expect("Failed to execute aizhong command")
}

/// Runs the binary with an emptied environment plus the given variables, so
/// configuration comes only from what the test provides.
fn run_aizhong_clean_env(args: &[&str], env_vars: Vec<(&str, &str)>) -> Output {
    let mut cmd = Command::new(aizhong_binary());
    cmd.args(args);
    cmd.env_clear();
    for (key, value) in env_vars {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to execute aizhong command")
}

/// Runs the binary pointed at a mock provider. The subprocess blocks, so it
/// goes through `spawn_blocking` to keep the mock server responsive.
async fn run_aizhong_against(server: &MockServer, args: &[&str]) -> Output {
    let uri = server.uri();
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();

    tokio::task::spawn_blocking(move || {
        let mut cmd = Command::new(aizhong_binary());
        cmd.args(&args);
        cmd.env("AIZHONG_PHONE", TEST_PHONE);
        cmd.env("AIZHONG_PASSWORD", "secret");
        cmd.env("AIZHONG_BASE_URL", uri);
        cmd.output().expect("Failed to execute aizhong command")
    })
    .await
    .expect("aizhong did not run to completion")
}

fn output_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Mounts a full happy-path provider: the five session steps plus both data
/// fetches, answering with two bindings and one water interruption notice.
async fn mount_provider(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/app/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code": "200", "message": "成功", "data": {"token": "cli-gw-1"}}"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/cart/getCart"))
        .and(header("Authorization", "cli-gw-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/app/queryCustInfo"))
        .and(header("Authorization", "cli-gw-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code": "200", "message": "成功",
                "data": {"custInfoList": [{"custId": "C-1", "custNo": "N-1"}]}}"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/app/userSwitchHandler"))
        .and(header("Authorization", "cli-gw-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code": "200", "message": "成功", "data": {"token": "cli-gw-2"}}"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/cis/ec_wa_wechatf/app/azLogOn"))
        .and(header("Authorization", "cli-gw-2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"CODE": "0", "DESC": "成功",
                "DATA": {"Authorization": "cli-portal-3", "accountNo": "ACC-9"}}"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/cis/ec_wa_wechatf/weChatRest/queryInBindConsDetails"))
        .and(header("Authorization", "cli-portal-3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"CODE": "0", "DESC": "成功", "DATA": [
                {"CONS_LIST": [{"ACCT_NAME": "张三"}],
                 "CONS_TYPE_NAME": "水", "PREPAY_BAL": "12.50"},
                {"CONS_LIST": [{"ACCT_NAME": "李小四"}],
                 "CONS_TYPE_NAME": "气", "PREPAY_BAL": "8.00"}
            ]}"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/cis/ec_wa_wechatf/sysRest/connmnRest"))
        .and(header("Authorization", "cli-portal-3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"CODE": "0", "DESC": "成功", "DATA": {"RTN_RESULT": [
                {"ENERGY_TYPE_NAME": "水务", "GAS_STOP_TYPE_NAME": "计划停水",
                 "PLAN_BGN_TIME": "2024-05-01 08:00", "PLAN_END_TIME": "2024-05-01 18:00",
                 "GAS_STOP_REA_NAME": "管网改造", "GAS_STOP_RANGE": "示例小区"}
            ]}}"#,
        ))
        .mount(server)
        .await;
}

mod help_command_tests {
    use super::*;

    #[test]
    fn test_help_lists_commands() {
        let output = run_aizhong(&["--help"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "--help should succeed");
        assert!(stdout.contains("aizhong"), "help should mention aizhong");
        assert!(stdout.contains("fetch"), "help should mention fetch command");
        assert!(stdout.contains("watch"), "help should mention watch command");
        assert!(
            stdout.contains("status"),
            "help should mention status command"
        );
    }

    #[test]
    fn test_fetch_help() {
        let output = run_aizhong(&["fetch", "--help"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "fetch --help should succeed");
        assert!(stdout.contains("--format"), "should mention --format");
    }

    #[test]
    fn test_watch_help() {
        let output = run_aizhong(&["watch", "--help"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "watch --help should succeed");
        assert!(stdout.contains("--interval"), "should mention --interval");
    }

    #[test]
    fn test_status_help() {
        let output = run_aizhong(&["status", "--help"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "status --help should succeed");
        assert!(stdout.contains("--format"), "should mention --format");
    }
}

mod version_flag_tests {
    use super::*;

    #[test]
    fn test_version_flag() {
        let output = run_aizhong(&["--version"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "--version should succeed");
        assert!(stdout.contains("aizhong"), "output should contain 'aizhong'");
        assert!(
            stdout.contains("0.1.0"),
            "output should contain version number"
        );
    }
}

mod invalid_command_tests {
    use super::*;

    #[test]
    fn test_invalid_command() {
        let output = run_aizhong(&["nonexistent-command"]);

        assert!(!output.status.success(), "invalid command should fail");
    }

    #[test]
    fn test_invalid_flag() {
        let output = run_aizhong(&["fetch", "--no-such-flag"]);

        assert!(!output.status.success(), "invalid flag should fail");
    }
}

mod verbose_flag_tests {
    use super::*;

    #[test]
    fn test_verbose_flag_accepted() {
        let output = run_aizhong(&["-v", "--help"]);

        assert!(output.status.success(), "-v flag should be accepted");
    }

    #[test]
    fn test_verbose_long_flag_accepted() {
        let output = run_aizhong(&["--verbose", "--help"]);

        assert!(output.status.success(), "--verbose flag should be accepted");
    }
}

mod config_validation_tests {
    use super::*;

    #[test]
    fn test_fetch_without_phone_fails() {
        let output = run_aizhong_clean_env(&["fetch"], vec![]);
        let stderr = stderr_to_string(&output);

        assert!(!output.status.success(), "fetch without config should fail");
        assert!(
            stderr.contains("AIZHONG_PHONE"),
            "stderr should name the missing variable, got: {stderr}"
        );
    }

    #[test]
    fn test_fetch_without_password_fails() {
        let output = run_aizhong_clean_env(&["fetch"], vec![("AIZHONG_PHONE", TEST_PHONE)]);
        let stderr = stderr_to_string(&output);

        assert!(!output.status.success());
        assert!(
            stderr.contains("AIZHONG_PASSWORD"),
            "stderr should name the missing variable, got: {stderr}"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let output = run_aizhong_clean_env(
            &["fetch"],
            vec![
                ("AIZHONG_PHONE", TEST_PHONE),
                ("AIZHONG_PASSWORD", "secret"),
                ("AIZHONG_BASE_URL", "ftp://example.com"),
            ],
        );
        let stderr = stderr_to_string(&output);

        assert!(!output.status.success());
        assert!(
            stderr.contains("base_url"),
            "stderr should name the bad key, got: {stderr}"
        );
    }
}

mod fetch_command_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fetch_renders_masked_snapshot() {
        let server = MockServer::start().await;
        mount_provider(&server).await;

        let output = run_aizhong_against(&server, &["fetch"]).await;
        let stdout = output_to_string(&output);

        assert!(
            output.status.success(),
            "fetch should succeed, stderr: {}",
            stderr_to_string(&output)
        );
        assert!(stdout.contains("三"), "table should list masked 张三");
        assert!(stdout.contains("李*四"), "table should list masked 李小四");
        assert!(stdout.contains("12.50"), "water balance should be shown");
        assert!(stdout.contains("8.00"), "gas balance should be shown");
        assert!(stdout.contains("管网改造"), "notice reason should be shown");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fetch_json_output_is_parseable() {
        let server = MockServer::start().await;
        mount_provider(&server).await;

        let output = run_aizhong_against(&server, &["fetch", "--format", "json"]).await;
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        let value: serde_json::Value =
            serde_json::from_str(stdout.trim()).expect("stdout should be valid JSON");
        assert_eq!(value["三"]["water_balance"], "12.50");
        assert_eq!(value["李*四"]["gas_balance"], "8.00");
        assert_eq!(value["三"]["interruption_notices"][0]["reason"], "管网改造");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fetch_fails_on_rejected_login() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/app/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"code": "500", "message": "密码错误"}"#),
            )
            .mount(&server)
            .await;

        let output = run_aizhong_against(&server, &["fetch"]).await;
        let stderr = stderr_to_string(&output);

        assert!(!output.status.success(), "rejected login should fail fetch");
        assert!(
            stderr.contains("密码错误"),
            "stderr should carry the provider message, got: {stderr}"
        );
    }
}

mod status_command_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_status_reports_available() {
        let server = MockServer::start().await;
        mount_provider(&server).await;

        let output = run_aizhong_against(&server, &["status"]).await;
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("Available"), "should show availability");
        assert!(stdout.contains("Yes"), "account should be available");
        assert!(stdout.contains("Sub-accounts"), "should show count");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_status_json_output() {
        let server = MockServer::start().await;
        mount_provider(&server).await;

        let output = run_aizhong_against(&server, &["status", "--format", "json"]).await;
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        let value: serde_json::Value =
            serde_json::from_str(stdout.trim()).expect("stdout should be valid JSON");
        assert_eq!(value["last_success"], true);
        assert_eq!(value["sub_accounts"], 2);
        assert_eq!(value["cycles_completed"], 1);
    }

    #[test]
    fn test_status_stays_observational_when_provider_down() {
        // Nothing listens on this port; the refresh fails but status still
        // reports instead of erroring out.
        let output = run_aizhong_clean_env(
            &["status"],
            vec![
                ("AIZHONG_PHONE", TEST_PHONE),
                ("AIZHONG_PASSWORD", "secret"),
                ("AIZHONG_BASE_URL", "http://127.0.0.1:9"),
                ("AIZHONG_REQUEST_TIMEOUT", "2"),
            ],
        );
        let stdout = output_to_string(&output);

        assert!(
            output.status.success(),
            "status should report, not fail, stderr: {}",
            stderr_to_string(&output)
        );
        assert!(stdout.contains("Available"), "should show availability");
        assert!(stdout.contains("No"), "account should be unavailable");
    }
}
