use sentipick_core::domain::Recommendation;
use std::fmt::Write;

const COMPANY_WIDTH: usize = 30;
const REASONING_WIDTH: usize = 50;
const DETAIL_COUNT: usize = 5;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

pub fn render_table(recommendations: &[Recommendation]) -> String {
    let rows: Vec<[String; 4]> = recommendations
        .iter()
        .map(|r| {
            [
                r.symbol.to_string(),
                truncate(&r.company_name, COMPANY_WIDTH),
                format!("{:.2}", r.confidence_score),
                truncate(&r.reasoning, REASONING_WIDTH),
            ]
        })
        .collect();

    let header = ["Symbol", "Company", "Sentiment Score", "Reasoning"];
    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w0$}  {:<w1$}  {:>w2$}  {:<w3$}",
        header[0],
        header[1],
        header[2],
        header[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    );
    let _ = writeln!(out, "{}", "-".repeat(widths.iter().sum::<usize>() + 6));
    for row in &rows {
        let _ = writeln!(
            out,
            "{:<w0$}  {:<w1$}  {:>w2$}  {:<w3$}",
            row[0],
            row[1],
            row[2],
            row[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        );
    }
    out
}

pub fn render_details(recommendations: &[Recommendation]) -> String {
    let mut out = String::new();
    for (i, r) in recommendations.iter().take(DETAIL_COUNT).enumerate() {
        let _ = writeln!(out, "{}. {} - {}", i + 1, r.symbol, r.company_name);
        let _ = writeln!(out, "   Sentiment Score: {:.2}", r.confidence_score);
        let _ = writeln!(out, "   Reasoning: {}", r.reasoning);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentipick_core::domain::Candidate;

    fn rec(symbol: &str, company: &str, score: f64, reasoning: &str) -> Recommendation {
        Recommendation {
            symbol: Candidate::new(symbol),
            company_name: company.to_string(),
            current_price: None,
            confidence_score: score,
            reasoning: reasoning.to_string(),
            sector: "Unknown".to_string(),
            market_cap: None,
            pe_ratio: None,
            trend_alignment: None,
        }
    }

    #[test]
    fn truncates_long_cells() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate(&"x".repeat(31), 30), format!("{}...", "x".repeat(30)));
    }

    #[test]
    fn table_has_header_and_one_line_per_row() {
        let recs = vec![
            rec("AAA", "Aaa Corp", 1.0, "Headline sentiment: 1.00. Sample: ['AAA gains']"),
            rec("BBB", &"B".repeat(40), 0.5, &"r".repeat(80)),
        ];
        let table = render_table(&recs);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Symbol"));
        assert!(lines[2].contains("1.00"));
        assert!(lines[3].contains(&format!("{}...", "B".repeat(30))));
        assert!(!lines[3].contains(&"r".repeat(51)));
    }

    #[test]
    fn details_cover_at_most_five() {
        let recs: Vec<_> = (0..7)
            .map(|i| rec(&format!("S{i}"), "Co", 0.5, "why"))
            .collect();
        let details = render_details(&recs);
        assert!(details.contains("5. S4 - Co"));
        assert!(!details.contains("6. S5"));
    }

    #[test]
    fn empty_list_renders_header_only() {
        assert_eq!(render_table(&[]).lines().count(), 2);
        assert!(render_details(&[]).is_empty());
    }
}
