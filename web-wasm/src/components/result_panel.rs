//! 解析結果（判定と詳細レポート）

use leptos::prelude::*;
use crate::app::Scanner;

#[component]
pub fn ResultPanel(scanner: Scanner) -> impl IntoView {
    let verdict = move || {
        scanner
            .controller
            .with(|c| c.verdict().unwrap_or_default().to_string())
    };
    let expanded = move || scanner.controller.with(|c| c.report_expanded());
    let rows = move || scanner.controller.with(|c| c.report_rows().to_vec());
    let ocr_text = move || {
        scanner.controller.with(|c| {
            c.latest_report()
                .and_then(|r| r.ocr_text())
                .map(str::to_string)
        })
    };

    view! {
        <div id="resultSection" class="result-section">
            <h2>"Quick Verdict"</h2>
            <p class="verdict">{verdict}</p>

            <button class="btn btn-secondary" on:click=move |_| scanner.toggle_report()>
                {move || if expanded() { "Hide detailed report" } else { "Show detailed report" }}
            </button>

            <Show when=expanded>
                <table id="detailedReport" class="report-table">
                    <thead>
                        <tr>
                            <th>"Nutrient"</th>
                            <th>"Impact"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            rows()
                                .into_iter()
                                .map(|row| {
                                    view! {
                                        <tr>
                                            <td>{row.nutrient}</td>
                                            <td>{row.impact}</td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
                {move || ocr_text().map(|text| view! {
                    <details class="ocr-text">
                        <summary>"Extracted text"</summary>
                        <pre>{text}</pre>
                    </details>
                })}
            </Show>

            <button class="btn btn-primary" on:click=move |_| scanner.scan_again()>
                "Scan another item"
            </button>
        </div>
    }
}
