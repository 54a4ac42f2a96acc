use std::process::Command;

fn main() {
    let described = Command::new("git")
        .args(["describe", "--tags", "--always"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string());

    let version = match described {
        Some(tag) => tag.strip_prefix('v').unwrap_or(&tag).to_string(),
        None => env!("CARGO_PKG_VERSION").to_string(),
    };

    println!("cargo:rustc-env=GIT_VERSION={version}");
}
