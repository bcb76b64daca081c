fn main() {
    println!("cargo:rerun-if-env-changed=TICKWORK_BOARD");

    // Board name shown in the startup banner. Defaults to the build target.
    let board = std::env::var("TICKWORK_BOARD")
        .or_else(|_| std::env::var("TARGET"))
        .unwrap_or_else(|_| "unknown".into());
    println!("cargo:rustc-env=TICKWORK_BOARD={board}");

    #[cfg(feature = "espidf")]
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
