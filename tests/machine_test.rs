mod common;

use common::{generate, options, read, write};
use std::path::Path;
use tempfile::TempDir;
use template_machine::context::Context;
use template_machine::encoding::TextEncoding;
use template_machine::error::Error;
use template_machine::machine::TemplateMachine;
use template_machine::renderer::MiniJinjaRenderer;

/// Three languages at the root and one mail in each of three directories.
fn multi_language_project(root: &Path) {
    write(root, "__localization/de.properties", "hello=Hallo\n");
    write(root, "__localization/en.properties", "hello=Hello\n");
    write(root, "__localization/es.properties", "hello=Hola\n");
    for dir in ["dir-1", "dir-2", "dir-3"] {
        write(root, &format!("{dir}/mail.txt"), "{{ hello }} from {{ templateRelativePath }}\n");
    }
}

#[test_log::test]
fn test_generates_every_directory_in_every_language() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    multi_language_project(project.path());

    let stats = generate(options(project.path(), output.path()));

    assert_eq!(stats.files(), 9);
    assert_eq!(
        stats.languages().iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["de", "en", "es"]
    );
    assert_eq!(read(output.path().join("dir-1/de/mail.txt")), "Hallo from dir-1/mail.txt\n");
    assert_eq!(read(output.path().join("dir-3/es/mail.txt")), "Hola from dir-3/mail.txt\n");
    assert!(!output.path().join("__localization").exists());
}

#[test]
fn test_generation_scope_limits_output() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    multi_language_project(project.path());

    let stats = generate(options(project.path(), output.path()).scope(project.path().join("dir-1")));

    assert_eq!(stats.files(), 3);
    assert!(output.path().join("dir-1/en/mail.txt").is_file());
    assert!(!output.path().join("dir-2").exists());
    assert!(!output.path().join("dir-3").exists());
}

#[test_log::test]
fn test_language_folder_shadows_generic_file() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), ".config", "languages=en,de\n");
    write(project.path(), "mail.txt", "generic {{ languageKey }}\n");
    write(project.path(), "de/mail.txt", "speziell {{ languageKey }}\n");

    let stats = generate(options(project.path(), output.path()));

    assert_eq!(stats.files(), 2);
    assert_eq!(read(output.path().join("en/mail.txt")), "generic en\n");
    assert_eq!(read(output.path().join("de/mail.txt")), "speziell de\n");
    assert!(!output.path().join("de/de").exists());
}

#[test]
fn test_language_folder_with_single_language() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), ".config", "languages=de\n");
    write(project.path(), "mail.txt", "generic\n");
    write(project.path(), "de/mail.txt", "speziell\n");
    write(project.path(), "de/only.txt", "nur hier\n");

    let stats = generate(options(project.path(), output.path()));

    assert_eq!(stats.files(), 2);
    assert_eq!(read(output.path().join("mail.txt")), "speziell\n");
    assert_eq!(read(output.path().join("only.txt")), "nur hier\n");
}

#[test]
fn test_nested_language_folders_are_rejected() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), ".config", "languages=en,de\n");
    write(project.path(), "de/en/mail.txt", "nested\n");

    let root = Context::root(options(project.path(), output.path())).unwrap();
    let renderer = MiniJinjaRenderer::new();
    let result = TemplateMachine::new(&renderer).generate(&root);

    assert!(matches!(result, Err(Error::ConfigError { .. })));
}

#[test]
fn test_generation_is_deterministic() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    multi_language_project(project.path());
    write(project.path(), "dir-2/de/mail.txt", "{{ hello }} aus {{ runDate }}\n");

    let first = generate(options(project.path(), output.path().join("first")));
    let second = generate(options(project.path(), output.path().join("second")));

    assert_eq!(first, second);
    assert!(!dir_diff::is_different(output.path().join("first"), output.path().join("second")).unwrap());
}

#[test]
fn test_without_languages_generates_default() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), "__localization/default.properties", "brand=ACME\n");
    write(project.path(), "mail.txt", "{{ brand }} / {{ languageKey }}\n");

    let stats = generate(options(project.path(), output.path()));

    assert_eq!(stats.files(), 1);
    assert_eq!(stats.to_string(), "1 file(s) in 1 language(s): default");
    assert_eq!(read(output.path().join("mail.txt")), "ACME / default\n");
}

#[test]
fn test_single_language_writes_without_language_folder() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), ".config", "languages=en\n");
    write(project.path(), "__localization/en.properties", "hello=Hello\n");
    write(project.path(), "sub/mail.txt", "{{ hello }}\n");

    generate(options(project.path(), output.path()));

    assert_eq!(read(output.path().join("sub/mail.txt")), "Hello\n");
    assert!(!output.path().join("sub/en").exists());
}

#[test]
fn test_includes_resolve_through_registry_chain() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), "__localization/default.properties", "brand=ACME\n");
    write(project.path(), "__templates/footer.txt", "Regards, {{ brand }}");
    write(project.path(), "a/mail.txt", "Hi\n{% include 'footer.txt' %}\n");
    write(project.path(), "b/__templates/footer.txt", "Cheers, {{ brand }}");
    write(project.path(), "b/mail.txt", "Hi\n{% include 'footer.txt' %}\n");

    generate(options(project.path(), output.path()));

    assert_eq!(read(output.path().join("a/mail.txt")), "Hi\nRegards, ACME\n");
    assert_eq!(read(output.path().join("b/mail.txt")), "Hi\nCheers, ACME\n");
    assert!(!output.path().join("b/__templates").exists());
}

#[test]
fn test_registered_template_overrides_content_file() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), "__templates/mail.txt", "from registry\n");
    write(project.path(), "sub/mail.txt", "from file\n");

    generate(options(project.path(), output.path()));

    assert_eq!(read(output.path().join("sub/mail.txt")), "from registry\n");
}

#[test]
fn test_template_error_names_target() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), "broken.txt", "{{ unclosed\n");

    let root = Context::root(options(project.path(), output.path())).unwrap();
    let renderer = MiniJinjaRenderer::new();

    match TemplateMachine::new(&renderer).generate(&root) {
        Err(Error::RenderError { target, source }) => {
            assert_eq!(target, output.path().join("broken.txt"));
            assert!(matches!(*source, Error::MinijinjaError(_)));
        }
        other => panic!("Expected RenderError, got {other:?}"),
    }
}

#[test]
fn test_undefined_placeholder_is_an_error() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), "mail.txt", "{{ missing }}\n");

    let root = Context::root(options(project.path(), output.path())).unwrap();
    let renderer = MiniJinjaRenderer::new();
    let result = TemplateMachine::new(&renderer).generate(&root);

    assert!(matches!(result, Err(Error::RenderError { .. })));
}

#[test]
fn test_run_keys_are_available() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), ".config", "languages=en\n");
    write(project.path(), "a/b/mail.txt", "{{ runDate }} {{ runTime }} {{ templateRelativePath }}\n");
    write(project.path(), "a/b/path.txt", "{{ templatePath }}");

    generate(options(project.path(), output.path()));

    assert_eq!(read(output.path().join("a/b/mail.txt")), "30/11/2021 14:07:09 a/b/mail.txt\n");
    let expected = std::path::absolute(project.path().join("a/b/path.txt")).unwrap();
    assert_eq!(read(output.path().join("a/b/path.txt")), expected.display().to_string());
}

#[test]
fn test_rfc1342_helper() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), "__localization/default.properties", "subject=Grüße aus Köln\n");
    write(project.path(), "header.txt", "Subject: {{ subject|rfc1342 }}");

    generate(options(project.path(), output.path()));

    assert_eq!(
        read(output.path().join("header.txt")),
        "Subject: =?UTF-8?Q?Gr=C3=BC=C3=9Fe_aus_K=C3=B6ln?="
    );
}

#[test]
fn test_write_encoding() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), "__localization/default.properties", "greeting=Grüße\n");
    write(project.path(), "mail.txt", "{{ greeting }}");

    let latin1 = TextEncoding::from_label("ISO-8859-1").unwrap();
    generate(options(project.path(), output.path()).write_encoding(latin1));

    let bytes = std::fs::read(output.path().join("mail.txt")).unwrap();
    assert_eq!(bytes, b"Gr\xfc\xdfe");
}

#[test]
fn test_artifacts_and_config_are_not_generated() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), ".config", "brand=ACME\n");
    write(project.path(), "mail.txt", "plain");
    write(project.path(), "mail.txt~", "backup");
    write(project.path(), "mail.txt.bak", "backup");
    write(project.path(), ".hidden/mail.txt", "hidden");

    let stats = generate(options(project.path(), output.path()));

    assert_eq!(stats.files(), 1);
    assert!(!output.path().join(".config").exists());
    assert!(!output.path().join("mail.txt~").exists());
    assert!(!output.path().join(".hidden").exists());
}

#[test]
fn test_generation_scope_is_resolved() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), "dir-1/mail.txt", "one\n");
    write(project.path(), "dir-2/mail.txt", "two\n");

    let scope = project.path().join("dir-1/../dir-2");
    let stats = generate(options(project.path(), output.path()).scope(scope));

    assert_eq!(stats.files(), 1);
    assert_eq!(read(output.path().join("dir-2/mail.txt")), "two\n");
    assert!(!output.path().join("dir-1").exists());
}

#[cfg(unix)]
#[test]
fn test_generation_scope_through_symlink() {
    let project = TempDir::new().unwrap();
    let links = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), "dir-1/mail.txt", "one\n");
    write(project.path(), "dir-2/mail.txt", "two\n");
    std::os::unix::fs::symlink(project.path().join("dir-1"), links.path().join("scope")).unwrap();

    let stats = generate(options(project.path(), output.path()).scope(links.path().join("scope")));

    assert_eq!(stats.files(), 1);
    assert_eq!(read(output.path().join("dir-1/mail.txt")), "one\n");
}

#[test]
fn test_unwritable_output_is_write_error() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(project.path(), "sub/mail.txt", "Hello\n");
    write(output.path(), "sub", "in the way");

    let root = Context::root(options(project.path(), output.path())).unwrap();
    let renderer = MiniJinjaRenderer::new();

    match TemplateMachine::new(&renderer).generate(&root) {
        Err(Error::WriteError { path, .. }) => assert_eq!(path, output.path().join("sub")),
        other => panic!("Expected WriteError, got {other:?}"),
    }
}
