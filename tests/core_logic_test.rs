use lvgl_compat_fix::builders::hooks::{self, BUILD_PROGRAM_TARGET, BuildHooks, HookPoint};
use lvgl_compat_fix::builders::reporter::{FixReporter, SilentReporter};
use lvgl_compat_fix::core::config::FixConfig;
use lvgl_compat_fix::core::engine::CompatEngine;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn setup_ui_dir() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let ui_dir = dir.path().join("src").join("ui");
    fs::create_dir_all(&ui_dir).unwrap();
    (dir, ui_dir)
}

fn engine_for(root: &Path) -> CompatEngine {
    CompatEngine::new(FixConfig::for_root(root)).unwrap()
}

/// Records what the engine reports instead of printing it.
#[derive(Default)]
struct RecordingReporter {
    banners: RefCell<usize>,
    summaries: RefCell<Vec<Vec<PathBuf>>>,
}

impl FixReporter for RecordingReporter {
    fn banner(&self) {
        *self.banners.borrow_mut() += 1;
    }

    fn report_summary(&self, modified: &[PathBuf]) {
        self.summaries.borrow_mut().push(modified.to_vec());
    }

    fn report_pending(&self, _pending: &[PathBuf]) {}
}

#[test]
fn test_end_to_end_header_fix() {
    let (_td, ui_dir) = setup_ui_dir();
    let header = ui_dir.join("ui.h");
    fs::write(
        &header,
        "#include \"lvgl/lvgl.h\"\n\nlv_obj_t * ui_Image1 = lv_image_create(ui_Screen1);\n",
    )
    .unwrap();

    let engine = engine_for(&ui_dir);
    let modified = engine.apply_fixes(&SilentReporter);
    assert_eq!(modified, vec![header.clone()]);

    let content = fs::read_to_string(&header).unwrap();
    assert!(content.contains("#include \"lvgl.h\""));
    assert!(content.contains("lv_img_create(ui_Screen1)"));
    assert!(!content.contains("lvgl/lvgl.h"));

    assert!(engine.apply_fixes(&SilentReporter).is_empty());
}

#[test]
fn test_second_run_is_idempotent() {
    let (_td, ui_dir) = setup_ui_dir();
    fs::write(ui_dir.join("a.c"), "lv_image_set_src(img, &ui_img_logo);\n").unwrap();
    fs::write(ui_dir.join("b.h"), "extern const lv_image_dsc_t ui_img_logo;\n").unwrap();
    fs::write(ui_dir.join("c.c"), "lv_screen_load_anim_t anim;\n").unwrap();

    let engine = engine_for(&ui_dir);
    assert_eq!(engine.apply_fixes(&SilentReporter).len(), 3);
    assert!(engine.apply_fixes(&SilentReporter).is_empty());
}

#[test]
fn test_other_extensions_are_untouched() {
    let (_td, ui_dir) = setup_ui_dir();
    let original = "lv_image_create(parent);\n";
    for name in ["screen.cpp", "notes.txt", "README.md", "ui.c.orig"] {
        fs::write(ui_dir.join(name), original).unwrap();
    }

    let engine = engine_for(&ui_dir);
    assert!(engine.apply_fixes(&SilentReporter).is_empty());

    for name in ["screen.cpp", "notes.txt", "README.md", "ui.c.orig"] {
        assert_eq!(fs::read_to_string(ui_dir.join(name)).unwrap(), original);
    }
}

#[test]
fn test_longer_identifiers_are_not_rewritten() {
    let (_td, ui_dir) = setup_ui_dir();
    let file = ui_dir.join("widgets.c");
    let original = "lv_image_create_extended(parent);\nmy_lv_image_dsc_t x;\n";
    fs::write(&file, original).unwrap();

    let engine = engine_for(&ui_dir);
    assert!(engine.apply_fixes(&SilentReporter).is_empty());
    assert_eq!(fs::read_to_string(&file).unwrap(), original);
}

#[test]
fn test_identity_rules_never_report_a_file() {
    let (_td, ui_dir) = setup_ui_dir();
    let file = ui_dir.join("slider.c");
    fs::write(
        &file,
        "lv_obj_set_style_bg_color(s, c, LV_PART_KNOB | LV_STATE_DEFAULT);\n\
         lv_obj_set_style_bg_color(s, c, LV_PART_INDICATOR);\n\
         LV_PART_CURSOR LV_PART_SELECTED LV_PART_ITEMS LV_PART_TICKS\n",
    )
    .unwrap();

    let engine = engine_for(&ui_dir);
    assert!(engine.apply_fixes(&SilentReporter).is_empty());
}

#[test]
fn test_missing_directory_returns_empty() {
    let td = tempfile::tempdir().unwrap();
    let reporter = RecordingReporter::default();

    let engine = engine_for(&td.path().join("src").join("ui"));
    assert!(engine.apply_fixes(&reporter).is_empty());
    assert_eq!(*reporter.summaries.borrow(), vec![Vec::<PathBuf>::new()]);
}

#[test]
fn test_bad_file_does_not_stop_the_run() {
    let (_td, ui_dir) = setup_ui_dir();
    let first = ui_dir.join("a.c");
    let second = ui_dir.join("b.c");
    let third = ui_dir.join("c.c");
    fs::write(&first, "lv_image_create(p);").unwrap();
    // not UTF-8, cannot be decoded as text
    fs::write(&second, [0xff, 0xfe, b'l', b'v', 0x80]).unwrap();
    fs::write(&third, "lv_image_get_src(img);").unwrap();

    let engine = engine_for(&ui_dir);
    let modified = engine.apply_fixes(&SilentReporter);

    assert_eq!(modified, vec![first.clone(), third.clone()]);
    assert_eq!(fs::read_to_string(&first).unwrap(), "lv_img_create(p);");
    assert_eq!(fs::read_to_string(&third).unwrap(), "lv_img_get_src(img);");
    assert_eq!(fs::read(&second).unwrap(), vec![0xff, 0xfe, b'l', b'v', 0x80]);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_does_not_stop_the_run() {
    use std::os::unix::fs::PermissionsExt;

    let (_td, ui_dir) = setup_ui_dir();
    let first = ui_dir.join("a.c");
    let second = ui_dir.join("b.c");
    let third = ui_dir.join("c.c");
    fs::write(&first, "lv_image_create(p);").unwrap();
    fs::write(&second, "lv_image_create(q);").unwrap();
    fs::write(&third, "lv_image_create(r);").unwrap();
    fs::set_permissions(&second, fs::Permissions::from_mode(0o000)).unwrap();

    // permission bits do not apply to root
    if fs::read(&second).is_ok() {
        return;
    }

    let modified = engine_for(&ui_dir).apply_fixes(&SilentReporter);

    fs::set_permissions(&second, fs::Permissions::from_mode(0o644)).unwrap();
    assert_eq!(modified, vec![first, third]);
    assert_eq!(fs::read_to_string(&second).unwrap(), "lv_image_create(q);");
}

#[test]
fn test_both_hook_points_run_the_rewriter() {
    let (_td, ui_dir) = setup_ui_dir();
    let file = ui_dir.join("ui_Screen1.c");
    fs::write(&file, "lv_obj_t * list = lv_list_create(p); LV_PART_LIST_MAIN;").unwrap();

    let engine = engine_for(&ui_dir);
    let reporter = RecordingReporter::default();
    let mut build_hooks = BuildHooks::new();
    hooks::register_compat_fixes(&mut build_hooks, &engine, &reporter);

    let loaded = build_hooks.fire(&HookPoint::ScriptLoad);
    let before_build = build_hooks.fire(&HookPoint::PreAction(BUILD_PROGRAM_TARGET.to_string()));

    assert_eq!(loaded, vec![file.clone()]);
    assert!(before_build.is_empty());
    assert_eq!(*reporter.banners.borrow(), 1);
    assert_eq!(reporter.summaries.borrow().len(), 2);
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "lv_obj_t * list = lv_list_create(p); LV_PART_MAIN;"
    );
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let (_td, ui_dir) = setup_ui_dir();
    let locked = ui_dir.join("a_locked");
    fs::create_dir_all(&locked).unwrap();
    fs::write(locked.join("hidden.c"), "lv_image_create(p);").unwrap();
    let sibling = ui_dir.join("b.c");
    fs::write(&sibling, "lv_image_create(q);").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // permission bits do not apply to root
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let modified = engine_for(&ui_dir).apply_fixes(&SilentReporter);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    assert_eq!(modified, vec![sibling.clone()]);
    assert_eq!(fs::read_to_string(&sibling).unwrap(), "lv_img_create(q);");
    assert_eq!(
        fs::read_to_string(locked.join("hidden.c")).unwrap(),
        "lv_image_create(p);"
    );
}

#[cfg(unix)]
#[test]
fn test_read_only_file_does_not_stop_the_run() {
    use std::os::unix::fs::PermissionsExt;

    let (_td, ui_dir) = setup_ui_dir();
    let first = ui_dir.join("a.c");
    let second = ui_dir.join("b.c");
    let third = ui_dir.join("c.c");
    fs::write(&first, "lv_image_create(p);").unwrap();
    fs::write(&second, "lv_image_create(q);").unwrap();
    fs::write(&third, "lv_image_create(r);").unwrap();
    fs::set_permissions(&second, fs::Permissions::from_mode(0o444)).unwrap();

    // permission bits do not apply to root
    if fs::OpenOptions::new().append(true).open(&second).is_ok() {
        return;
    }

    let modified = engine_for(&ui_dir).apply_fixes(&SilentReporter);

    assert_eq!(modified, vec![first, third]);
    assert_eq!(fs::read_to_string(&second).unwrap(), "lv_image_create(q);");
}
