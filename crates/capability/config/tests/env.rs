use lucid_config::AppConfig;

#[test]
fn load_config_from_process_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（本文件只有这一个测试，不会并发改写环境）。
    unsafe {
        std::env::set_var("DB_NAME", "lucid_lists_env_test");
        std::env::set_var("SERVER_HOST", "127.0.0.1");
        std::env::set_var("FRONTEND_PORT", "5999");
    }

    let config = AppConfig::from_env();
    assert_eq!(config.db_name, "lucid_lists_env_test");
    assert_eq!(config.server_host, "127.0.0.1");
    assert_eq!(
        config.cors_allowed_origins.last().map(String::as_str),
        Some("http://localhost:5999")
    );
}
