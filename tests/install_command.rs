//! End-to-end install behavior through the public library API.

mod common;

use common::TestRepo;
use dotfiles_deploy::materialize::Mode;

const SIMPLE: &str = "directories:\n  - path: files\n    target: '{target}'\n";

#[test]
fn install_copies_files_and_records_state() {
    let repo = TestRepo::with_config(SIMPLE);
    repo.write_source_file("files/bashrc", "alias ll='ls -l'");
    repo.write_source_file("files/config/git/config", "[user]\n\tname = alice");

    let report = repo.install(Mode::Copy, false).expect("install");
    assert_eq!(report.deployed, 2);

    assert_eq!(
        std::fs::read_to_string(repo.target().join("bashrc")).expect("read target"),
        "alias ll='ls -l'"
    );
    assert!(repo.target().join("config/git/config").is_file());
    assert_eq!(repo.managed_files().len(), 2);
}

#[test]
fn install_twice_is_idempotent() {
    let repo = TestRepo::with_config(SIMPLE);
    repo.write_source_file("files/bashrc", "x");
    repo.write_source_file("files/profile", "y");

    repo.install(Mode::Copy, false).expect("first install");
    let first = repo.managed_files();

    repo.install(Mode::Copy, false).expect("second install");
    let second = repo.managed_files();

    assert_eq!(first, second, "managed set must not drift across runs");
    assert_eq!(
        std::fs::read_to_string(repo.target().join("bashrc")).expect("read"),
        "x"
    );
}

#[test]
fn existing_target_is_never_overwritten_in_copy_mode() {
    let repo = TestRepo::with_config(SIMPLE);
    repo.write_source_file("files/bashrc", "from dotfiles");
    std::fs::write(repo.target().join("bashrc"), "user's own edit").expect("seed target");

    repo.install(Mode::Copy, false).expect("install");
    assert_eq!(
        std::fs::read_to_string(repo.target().join("bashrc")).expect("read"),
        "user's own edit"
    );
}

#[cfg(unix)]
#[test]
fn symlink_mode_converges_to_the_new_source() {
    let repo = TestRepo::with_config(SIMPLE);
    repo.write_source_file("files/bashrc", "v1");
    repo.install(Mode::Symlink, false).expect("first install");

    let link = repo.target().join("bashrc");
    assert_eq!(
        std::fs::read_link(&link).expect("read link"),
        repo.source().join("files/bashrc")
    );

    // The source tree moves; reinstalling must repoint the link, never
    // leave it stale.
    let moved = repo.source().parent().expect("parent").join("src-moved");
    copy_tree(&repo.source(), &moved);
    repo.install_from(moved.clone(), Mode::Symlink)
        .expect("second install");

    assert_eq!(
        std::fs::read_link(&link).expect("read link"),
        moved.join("files/bashrc")
    );
    assert_eq!(
        std::fs::read_to_string(&link).expect("follow link"),
        "v1"
    );
}

#[cfg(unix)]
fn copy_tree(from: &std::path::Path, to: &std::path::Path) {
    std::fs::create_dir_all(to).expect("create tree root");
    for entry in walkdir_shim(from) {
        let rel = entry.strip_prefix(from).expect("under root").to_path_buf();
        let dest = to.join(rel);
        if entry.is_dir() {
            std::fs::create_dir_all(&dest).expect("create dir");
        } else {
            std::fs::create_dir_all(dest.parent().expect("parent")).expect("create parents");
            std::fs::copy(&entry, &dest).expect("copy file");
        }
    }
}

#[cfg(unix)]
fn walkdir_shim(root: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).expect("read dir") {
            let path = entry.expect("dir entry").path();
            if path.is_dir() {
                stack.push(path.clone());
            }
            out.push(path);
        }
    }
    out
}

#[test]
fn template_files_render_with_theme_properties() {
    let config = r"
directories:
  - path: files
    target: '{target}'
    templateFiles:
      - files/alacritty.toml
themes:
  - name: dark
    fontFamily: Iosevka
    properties:
      accent-color: '#d65d0e'
";
    let repo = TestRepo::with_config(config);
    repo.write_source_file(
        "files/alacritty.toml",
        "family = {{ fontFamily }}\naccent = {{ accentcolor }}",
    );

    repo.install_with_theme(Mode::Copy, false, Some("dark"))
        .expect("install");

    assert_eq!(
        std::fs::read_to_string(repo.target().join("alacritty.toml")).expect("read"),
        "family = Iosevka\naccent = #d65d0e"
    );
}

#[test]
fn theme_files_pick_the_matching_variant() {
    let config = r"
directories:
  - path: files
    target: '{target}'
    themeFiles:
      - target: '{target}/colors.toml'
        sources:
          gruvbox: colors-by-scheme.toml
          dark: colors-by-name.toml
themes:
  - name: dark
    colorScheme: gruvbox
";
    let repo = TestRepo::with_config(config);
    repo.write_source_file("files/colors-by-scheme.toml", "scheme");
    repo.write_source_file("files/colors-by-name.toml", "name");

    repo.install_with_theme(Mode::Copy, false, Some("dark"))
        .expect("install");

    // Exact name match wins over the color-scheme match.
    assert_eq!(
        std::fs::read_to_string(repo.target().join("colors.toml")).expect("read"),
        "name"
    );
}

#[test]
fn rules_exclude_files_from_deployment() {
    let config = r"
directories:
  - path: files
    target: '{target}'
    rules:
      - rule: 'true'
        exclude:
          - secret.conf
";
    let repo = TestRepo::with_config(config);
    repo.write_source_file("files/public.conf", "ok");
    repo.write_source_file("files/secret.conf", "nope");

    let report = repo.install(Mode::Copy, false).expect("install");
    assert_eq!(report.deployed, 1);
    assert!(repo.target().join("public.conf").exists());
    assert!(!repo.target().join("secret.conf").exists());
}

#[test]
fn dry_run_never_mutates_the_filesystem() {
    let config = r"
directories:
  - path: files
    target: '{target}'
themes:
  - name: dark
    commands:
      - command: should-not-run
";
    let repo = TestRepo::with_config(config);
    repo.write_source_file("files/bashrc", "x");

    let report = repo
        .install_with_theme(Mode::Copy, true, Some("dark"))
        .expect("dry-run install");

    assert_eq!(report.deployed, 1, "dry-run still reports the plan");
    assert!(!repo.target().join("bashrc").exists());
    assert!(!repo.state_file().exists());
    assert!(repo.runner.commands().is_empty(), "no activation on dry-run");
}

#[test]
fn activation_commands_run_global_then_theme() {
    let config = r"
directories: []
activationCommands:
  - command: global-reload
themes:
  - name: dark
    commands:
      - command: set-wallpaper
";
    let repo = TestRepo::with_config(config);

    let report = repo
        .install_with_theme(Mode::Copy, false, Some("dark"))
        .expect("install");

    assert_eq!(report.activated, 2);
    assert_eq!(repo.runner.commands(), vec!["global-reload", "set-wallpaper"]);
}
