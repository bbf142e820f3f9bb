use ratatui::text::Line;
use richrun_core::AttachmentMap;
use richrun_core::AttributeSet;
use richrun_core::theme::Theme;
use richrun_markdown::{
    CompileOptions, ListMarkers, ParseOptions, PlainTextHtmlRenderer, Tree, compile_document_with,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Debug)]
struct GoldenCase {
    name: &'static str,
    fixture: &'static str,
    options: CompileOptions,
}

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .canonicalize()
        .expect("repo root")
}

fn read_fixture(rel: &str) -> String {
    fs::read_to_string(repo_root().join(rel)).expect("read fixture")
}

fn golden_path(case: &GoldenCase) -> PathBuf {
    repo_root()
        .join("docs/fixtures/golden/richrun")
        .join(format!("{}.txt", case.name))
}

fn normalize(s: &str) -> String {
    let mut out = String::new();
    for (i, line) in s.replace("\r\n", "\n").split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.trim_end());
    }
    out.trim_end_matches('\n').to_string()
}

fn line_to_plain(line: &Line<'_>) -> String {
    line.spans
        .iter()
        .map(|s| s.content.as_ref())
        .collect::<Vec<_>>()
        .join("")
}

fn render(case: &GoldenCase) -> String {
    let md = read_fixture(case.fixture);
    let tree = Tree::parse(&md, &ParseOptions::default());
    let text = compile_document_with(
        &tree,
        &AttributeSet::new(),
        &AttachmentMap::new(),
        &case.options,
    )
    .expect("compile fixture");
    let lines = text
        .to_text(&Theme::default())
        .lines
        .iter()
        .map(line_to_plain)
        .collect::<Vec<_>>()
        .join("\n");
    normalize(&lines)
}

fn update_goldens_enabled() -> bool {
    matches!(
        std::env::var("UPDATE_GOLDENS").as_deref(),
        Ok("1" | "true" | "yes")
    )
}

fn check_golden(case: GoldenCase) {
    let got = render(&case);
    let path = golden_path(&case);

    if update_goldens_enabled() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create golden dir");
        }
        fs::write(&path, format!("{got}\n")).expect("write golden");
        return;
    }

    let expected = fs::read_to_string(&path).unwrap_or_else(|_| {
        panic!(
            "missing golden file: {}\nRun: UPDATE_GOLDENS=1 cargo test -p richrun-markdown golden",
            path.display()
        )
    });
    let expected = normalize(&expected);
    assert_eq!(
        got,
        expected,
        "golden mismatch: {}\nRun: UPDATE_GOLDENS=1 cargo test -p richrun-markdown golden",
        path.display()
    );
}

#[test]
fn golden_showcase_tiered() {
    check_golden(GoldenCase {
        name: "showcase__tiered",
        fixture: "docs/fixtures/showcase.md",
        options: CompileOptions::default(),
    });
}

#[test]
fn golden_showcase_plain() {
    check_golden(GoldenCase {
        name: "showcase__plain",
        fixture: "docs/fixtures/showcase.md",
        options: CompileOptions {
            list_markers: ListMarkers::Plain,
            indent: "  ".to_string(),
            ..CompileOptions::default()
        },
    });
}

#[test]
fn golden_html_fallback_literal() {
    check_golden(GoldenCase {
        name: "html_fallback__literal",
        fixture: "docs/fixtures/html_fallback.md",
        options: CompileOptions::default(),
    });
}

#[test]
fn golden_html_fallback_plain_text() {
    check_golden(GoldenCase {
        name: "html_fallback__plain_text",
        fixture: "docs/fixtures/html_fallback.md",
        options: CompileOptions {
            html_renderer: Arc::new(PlainTextHtmlRenderer),
            ..CompileOptions::default()
        },
    });
}
