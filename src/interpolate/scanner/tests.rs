use std::{fs, path::Path};

use super::*;

macro_rules! testlist {
    ($($name:ident,)*) => {
    $(
        #[test]
        fn $name() {
            run_test(stringify!($name))
        }
    )*
    }
}

testlist! {
    default_empty,
    default_with_colon,
    many_placeholders,
    name_only,
    no_placeholders,
    unterminated,
    with_default,
    yaml_lines,
}

fn run_test(name: &str) {
    let rootdir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let test_data_dir = rootdir.join("src/interpolate/scanner/tests/testdata");

    let test_file = test_data_dir.join(format!("tests/{}.txt", name));
    let expected_file = test_data_dir.join(format!("expected/{}.txt", name));
    let actual_dir = test_data_dir.join("actual");
    let actual_file = actual_dir.join(format!("{}.txt", name));

    let test = fs::read_to_string(test_file).unwrap();

    let scanner = Scanner::new();
    let segments = scanner.scan(&test);
    let actual = format_segments(&segments);

    fs::create_dir_all(actual_dir).unwrap();
    fs::write(actual_file, &actual).unwrap();

    let expected = fs::read_to_string(expected_file).unwrap();
    assert_eq!(expected, actual);
}

fn format_segments(segments: &[Segment]) -> String {
    let mut string = String::new();

    string.push_str("SEGMENTS:\n");
    for segment in segments {
        match segment {
            Segment::Text(text) => string.push_str(&format!("text {:?}\n", text)),
            Segment::Placeholder(placeholder) => string.push_str(&format!(
                "var {:?} default={:?} span={}..{}\n",
                placeholder.name, placeholder.default, placeholder.span.start, placeholder.span.end
            )),
        }
    }

    return string;
}

#[test]
fn scan_empty_text() {
    let scanner = Scanner::new();
    assert_eq!(scanner.scan(""), Vec::new());
}

#[test]
fn scan_dollar_without_brace_is_text() {
    let scanner = Scanner::new();
    assert_eq!(scanner.scan("cost: $5"), vec![Segment::Text("cost: $5".to_string())]);
}
