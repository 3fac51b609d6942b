use super::*;

#[test]
fn renders_report_tables() {
    let html = render_markdown_html("| region | total |\n|---|---|\n| EU | 42 |\n");
    assert!(html.contains("<table>"));
    assert!(html.contains("<td>EU</td>"));
}

#[test]
fn strips_raw_html() {
    let html = render_markdown_html("before <script>alert(1)</script> after");
    assert!(!html.contains("<script>"));
    assert!(html.contains("before"));
}

#[test]
fn renders_emphasis() {
    assert_eq!(render_markdown_html("**Q3** revenue"), "<p><strong>Q3</strong> revenue</p>\n");
}
