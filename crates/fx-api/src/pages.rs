//! 서버 렌더링 HTML 페이지.
//!
//! - 최신 환율 페이지 (`/currency-view`)
//! - 환율 차트 페이지 (`/currency-chart-page`): 데이터는 JSON으로 삽입되고
//!   `/static/js/currency-chart.js`가 브라우저에서 그립니다.
//! - 에러 페이지

use axum::http::StatusCode;
use fx_core::{FilteredSeries, LatestRate, TrailingWindow};
use serde::Serialize;

/// Chart.js CDN 주소.
const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js@4";

/// HTML 특수문자를 이스케이프합니다.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<script>` 태그 안에 넣을 JSON 문자열.
///
/// `</script>`로 태그가 닫히지 않도록 `<`를 유니코드 이스케이프합니다.
pub fn embed_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

fn layout(title: &str, head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="/static/css/style.css">
{head}</head>
<body>
  <main class="container">
{body}
  </main>
</body>
</html>
"#,
        title = escape_html(title),
        head = head,
        body = body,
    )
}

/// 최신 환율 페이지.
pub fn render_currency_view(latest: &LatestRate) -> String {
    let title = format!("{} to {} Exchange Rate", latest.base, latest.target);
    let body = format!(
        r#"    <h1>{title}</h1>
    <section class="rate-card">
      <p class="rate">1 {base} = <strong>{rate}</strong> {target}</p>
      <p class="date">As of {date}</p>
    </section>
    <p><a href="/currency-chart-page">View chart</a></p>
"#,
        title = escape_html(&title),
        base = escape_html(latest.base.as_str()),
        target = escape_html(latest.target.as_str()),
        rate = latest.rate,
        date = latest.date.format("%Y-%m-%d"),
    );
    layout(&title, "", &body)
}

/// 환율 차트 페이지.
///
/// 기간 내 레코드가 없으면 차트 대신 안내 문구를 보여줍니다.
pub fn render_chart_page(
    series: &FilteredSeries,
    window: TrailingWindow,
) -> serde_json::Result<String> {
    let title = format!("{} to {} Exchange Rate", series.base, series.target);
    let subtitle = format!(
        "{}: {} - {}",
        window.label(),
        series.from.format("%Y-%m-%d"),
        series.to.format("%Y-%m-%d")
    );

    if series.is_empty() {
        let body = format!(
            r#"    <h1>{title}</h1>
    <p class="subtitle">{subtitle}</p>
    <p class="notice">No exchange rate data available for this period.</p>
"#,
            title = escape_html(&title),
            subtitle = escape_html(&subtitle),
        );
        return Ok(layout(&title, "", &body));
    }

    let summary = match (series.records.last(), series.min_max()) {
        (Some(last), Some((low, high))) => format!(
            r#"    <ul class="summary">
      <li>Latest ({date}): <strong>{latest}</strong></li>
      <li>Low: {low}</li>
      <li>High: {high}</li>
      <li>Records: {count}</li>
    </ul>
"#,
            date = last.date.format("%Y-%m-%d"),
            latest = last.currency,
            low = low,
            high = high,
            count = series.len(),
        ),
        _ => String::new(),
    };

    let head = format!(
        "  <script src=\"{}\"></script>\n  <script src=\"/static/js/currency-chart.js\" defer></script>\n",
        CHART_JS_URL
    );
    let body = format!(
        r#"    <h1>{title}</h1>
    <p class="subtitle">{subtitle}</p>
{summary}    <canvas id="currency-chart" width="960" height="480"></canvas>
    <script id="chart-data" type="application/json">{payload}</script>
"#,
        title = escape_html(&title),
        subtitle = escape_html(&subtitle),
        summary = summary,
        payload = embed_json(series)?,
    );

    Ok(layout(&title, &head, &body))
}

/// 에러 페이지.
pub fn render_error_page(status: StatusCode, message: &str) -> String {
    let title = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    let body = format!(
        r#"    <h1>{title}</h1>
    <p class="error">{message}</p>
    <p><a href="/">Back</a></p>
"#,
        title = escape_html(&title),
        message = escape_html(message),
    );
    layout(&title, "", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fx_core::{CurrencyCode, RateRecord, RateSeries};
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn window_series(records: Vec<RateRecord>) -> FilteredSeries {
        RateSeries::new(CurrencyCode::usd(), CurrencyCode::krw(), records)
            .between(date("2024-11-11"), date("2025-01-10"))
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_embed_json_cannot_close_script() {
        let json = embed_json(&serde_json::json!({"s": "</script>"})).unwrap();
        assert!(!json.contains("</script>"));
        let back: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back["s"], "</script>");
    }

    #[test]
    fn test_chart_page_embeds_payload() {
        let series = window_series(vec![
            RateRecord::new(date("2025-01-02"), dec!(1470.5)),
            RateRecord::new(date("2025-01-03"), dec!(1465.2)),
        ]);

        let html = render_chart_page(&series, TrailingWindow::SIXTY_DAYS).unwrap();

        assert!(html.contains("USD to KRW Exchange Rate"));
        assert!(html.contains("Last 60 Days: 2024-11-11 - 2025-01-10"));
        assert!(html.contains(r#""filtered_data":[{"date":"2025-01-02","currency":1470.5}"#));
        assert!(html.contains("/static/js/currency-chart.js"));
        assert!(html.contains("Low: 1465.2"));
    }

    #[test]
    fn test_chart_page_empty_window_shows_notice() {
        let series = window_series(vec![RateRecord::new(date("2020-01-02"), dec!(1150))]);

        let html = render_chart_page(&series, TrailingWindow::SIXTY_DAYS).unwrap();

        assert!(html.contains("No exchange rate data available"));
        assert!(!html.contains("chart-data"));
    }

    #[test]
    fn test_currency_view() {
        let latest = LatestRate {
            base: CurrencyCode::usd(),
            target: CurrencyCode::krw(),
            date: date("2025-01-10"),
            rate: dec!(1472.1),
        };

        let html = render_currency_view(&latest);
        assert!(html.contains("1 USD = <strong>1472.1</strong> KRW"));
        assert!(html.contains("As of 2025-01-10"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = render_error_page(StatusCode::NOT_FOUND, "file <x> not found");
        assert!(html.contains("404 Not Found"));
        assert!(html.contains("file &lt;x&gt; not found"));
    }
}
