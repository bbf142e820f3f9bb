use ratatui::text::Line;
use richrun_core::AttachmentMap;
use richrun_core::AttributeSet;
use richrun_core::theme::Theme;
use richrun_markdown::{CompileOptions, ListMarkers, ParseOptions, Tree, compile_document_with};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

fn main() -> io::Result<()> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        return Ok(());
    }

    let mut options = CompileOptions::default();
    let mut show_runs = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                show_runs = true;
                i += 1;
            }
            "--plain-markers" => {
                options.list_markers = ListMarkers::Plain;
                i += 1;
            }
            "--respect-list-start" => {
                options.respect_list_start = true;
                i += 1;
            }
            "--indent" => {
                options.indent = parse_string(&args, &mut i, "--indent")?;
            }
            "--base-url" => {
                options.base_url = Some(parse_string(&args, &mut i, "--base-url")?);
            }
            _ => break,
        }
    }

    let input = if i < args.len() {
        let path = &args[i];
        let input = fs::read_to_string(path)?;
        if options.base_url.is_none()
            && let Some(parent) = Path::new(path).parent()
        {
            let abs = fs::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf());
            options.base_url = Some(format!("file://{}/", abs.display()));
        }
        input
    } else {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s)?;
        s
    };

    let tree = Tree::parse(&input, &ParseOptions::default());
    let text = compile_document_with(&tree, &AttributeSet::new(), &AttachmentMap::new(), &options)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if show_runs {
        for (range, run) in text.ranges() {
            let keys = run
                .attributes
                .iter()
                .map(|(key, _)| key.to_string())
                .collect::<Vec<_>>()
                .join(",");
            println!("{range:?}\t{:?}\t[{keys}]", run.text);
        }
        return Ok(());
    }

    let theme = Theme::default();
    for line in &text.to_text(&theme).lines {
        println!("{}", line_to_plain(line));
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        "Usage: dump [options] [path]\n\
\n\
Options:\n\
  --runs                      Print one line per run with its byte range and attribute keys\n\
  --plain-markers             Use `•` and `N.` markers at every nesting level\n\
  --respect-list-start        Number ordered lists from their source start number\n\
  --indent <text>             Indentation unit per nesting level (default: tab)\n\
  --base-url <url>            Resolve relative links against this base\n\
  -h, --help                  Show this help\n\
\n\
If [path] is omitted, reads Markdown from stdin."
    );
}

fn parse_string(args: &[String], i: &mut usize, flag: &str) -> io::Result<String> {
    let Some(v) = args.get(*i + 1) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{flag} expects a value"),
        ));
    };
    *i += 2;
    Ok(v.to_string())
}

fn line_to_plain(line: &Line<'_>) -> String {
    line.spans
        .iter()
        .map(|s| s.content.as_ref())
        .collect::<Vec<_>>()
        .join("")
}
