//! Embeds the short git revision so `--version` and asset URLs can tell
//! builds apart.

fn git(args: &[&str]) -> Option<String> {
    std::process::Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let revision = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_default();
    let dirty = git(&["status", "--porcelain"]).is_some_and(|s| !s.is_empty());

    let revision = match (revision.is_empty(), dirty) {
        (true, _) => String::new(),
        (false, true) => format!("{revision}+dirty"),
        (false, false) => revision,
    };
    println!("cargo:rustc-env=GIT_REVISION={revision}");
}
