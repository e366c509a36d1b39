use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::workflows::grading::ClassificationRecord;

/// Result table markup, grades tagged with their letter as CSS class.
pub fn render_results_table(records: &[ClassificationRecord]) -> String {
    let mut html = String::from(
        "<table id=\"table\">\n<tr><th>책이름</th><th>검색량</th><th>판매처개수</th><th>분류</th><th>링크</th></tr>\n",
    );

    for record in records {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td><a href=\"{}\" target=\"_blank\" rel=\"noopener\">열기</a></td></tr>",
            encode_text(&record.title),
            record.search_volume,
            record.seller_count,
            record.grade,
            record.grade,
            encode_double_quoted_attribute(&record.link),
        );
    }

    html.push_str("</table>\n");
    html
}

/// Standalone page for the form-post flow.
pub fn render_results_page(records: &[ClassificationRecord]) -> String {
    let mut html = String::from(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n<title>BookVPro 결과</title>\n<style>\nbody{font-family:Arial;padding:40px;}\ntable{border-collapse:collapse;margin-top:20px;}\nth,td{border:1px solid #ccc;padding:8px;text-align:center;}\nth{background:#222;color:#fff;}\n.A{color:green;font-weight:bold;}\n.B{color:red;font-weight:bold;}\n.C{color:orange;font-weight:bold;}\n</style>\n</head>\n<body>\n",
    );
    let _ = writeln!(html, "<h2>분석 결과 ({}권)</h2>", records.len());
    html.push_str(&render_results_table(records));
    html.push_str("<p><a href=\"/\">다시 검색</a></p>\n</body>\n</html>\n");
    html
}
