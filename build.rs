fn main() {
    println!("cargo:rerun-if-changed=images/avatar.png");

    let config = slint_build::CompilerConfiguration::new()
        .with_include_paths(vec!["ui".into(), "ui/components".into()]);
    slint_build::compile_with_config("ui/app.slint", config)
        .expect("failed to compile ui/app.slint; check the Slint syntax and component paths");
}
