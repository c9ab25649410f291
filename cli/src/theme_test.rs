use super::*;

fn temp_prefs() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("prefs.json");
    (dir, path)
}

#[test]
fn missing_file_defaults_to_light() {
    let (_dir, path) = temp_prefs();
    assert_eq!(read_preference(&path), Mode::Light);
}

#[test]
fn corrupt_file_defaults_to_light() {
    let (_dir, path) = temp_prefs();
    std::fs::write(&path, "{not json").unwrap();
    assert_eq!(read_preference(&path), Mode::Light);
}

#[test]
fn toggle_persists_across_simulated_restart() {
    let (_dir, path) = temp_prefs();

    let mode = read_preference(&path);
    let mode = toggle(&path, mode);
    assert_eq!(mode, Mode::Dark);

    // Fresh initialization reflects the last written value.
    assert_eq!(read_preference(&path), Mode::Dark);

    let mode = toggle(&path, mode);
    assert_eq!(mode, Mode::Light);
    assert_eq!(read_preference(&path), Mode::Light);
}

#[test]
fn double_toggle_reproduces_original_palette() {
    let start = Mode::Light;
    let back = start.toggled().toggled();
    assert_eq!(back, start);
    assert!(std::ptr::eq(back.palette(), start.palette()));
}

#[test]
fn toggle_write_failure_is_swallowed() {
    // A directory that does not exist makes the write fail; the returned
    // mode must still flip.
    let path = Path::new("/nonexistent-ticklist-dir/prefs.json");
    let mode = toggle(path, Mode::Light);
    assert_eq!(mode, Mode::Dark);
}

#[test]
fn palettes_are_mode_specific() {
    assert_eq!(Mode::Light.palette().bg, "#FFF7FB");
    assert_eq!(Mode::Dark.palette().bg, "#120A10");
    // Accents are shared between modes.
    assert_eq!(Mode::Light.palette().primary, Mode::Dark.palette().primary);
    assert_eq!(LIGHT.status_bar, StatusBarStyle::DarkContent);
    assert_eq!(DARK.status_bar, StatusBarStyle::LightContent);
}

#[test]
fn gradient_tables_pair_endpoints() {
    assert_eq!(LIGHT.gradients.primary, ["#FF4DA6", "#E6007A"]);
    assert_eq!(DARK.gradients.primary, ["#FF4DA6", "#B3005E"]);
    assert_eq!(LIGHT.backgrounds.edit_input, "#FFF0F7");
    assert_eq!(DARK.backgrounds.edit_input, "#2A1630");
}

#[test]
fn hex_parsing() {
    assert_eq!(hex_to_rgb("#FF4DA6"), Some((0xFF, 0x4D, 0xA6)));
    assert_eq!(hex_to_rgb("#000000"), Some((0, 0, 0)));
    assert_eq!(hex_to_rgb("FF4DA6"), None);
    assert_eq!(hex_to_rgb("#FFF"), None);
    assert_eq!(hex_to_rgb("#GGGGGG"), None);
    // Six bytes of non-ASCII must fail cleanly, not slice mid-char.
    assert_eq!(hex_to_rgb("#€€"), None);
    assert_eq!(hex_to_rgb("#ａｂ"), None);
}

#[test]
fn paint_wraps_in_ansi_escape() {
    assert_eq!(paint("#FF4DA6", "hi"), "\x1b[38;2;255;77;166mhi\x1b[0m");
    // Bad colors degrade to plain text.
    assert_eq!(paint("oops", "hi"), "hi");
}

#[test]
fn prefs_path_honors_env_override() {
    // No other test reads TICKLIST_PREFS, so this cannot race.
    let (_dir, path) = temp_prefs();
    unsafe { std::env::set_var("TICKLIST_PREFS", &path) };
    assert_eq!(default_prefs_path(), path);
    unsafe { std::env::remove_var("TICKLIST_PREFS") };
}
