use std::io;
use std::path::PathBuf;

use template_machine::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::config("/project/mails", "cannot process language definition 'a=b=c'");
    assert_eq!(
        err.to_string(),
        "Configuration error in '/project/mails': cannot process language definition 'a=b=c'."
    );

    let err = Error::TemplateNotFound { name: "footer.txt".to_string() };
    assert_eq!(err.to_string(), "Template 'footer.txt' not found.");

    let err = Error::EncodingError("klingon".to_string());
    assert_eq!(err.to_string(), "Unknown encoding: 'klingon'.");
}

#[test]
fn test_render_error_keeps_cause() {
    let err = Error::RenderError {
        target: PathBuf::from("/out/en/mail.txt"),
        source: Box::new(Error::TemplateNotFound { name: "footer.txt".to_string() }),
    };

    assert_eq!(err.to_string(), "Cannot generate '/out/en/mail.txt': Template 'footer.txt' not found.");
    let cause = std::error::Error::source(&err).map(ToString::to_string);
    assert_eq!(cause.as_deref(), Some("Template 'footer.txt' not found."));
}
