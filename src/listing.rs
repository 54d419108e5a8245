//! The marketplace listing's rendered surface: selectors, the read-only
//! queries evaluated against it, and the row-group arithmetic that ties the
//! page-size setting to a stabilization target.

use crate::config::PageSize;

/// Search keyword input.
pub const SEARCH_INPUT: &str = "#includeKeywords";

/// Results-per-page `<select>`.
pub const PAGE_SIZE_SELECT: &str = "#resultsPerPage";

/// Sort-order `<select>`.
pub const SORT_FIELD_SELECT: &str = "#sortField";

/// The "next page" control. Its absence means the listing cannot advance.
pub const NEXT_CONTROL: &str = "#results a.nextPage";

/// Row-group containers a single record renders into. The listing wraps each
/// record in three `<tbody>` row groups (result, stats, icons), so a settled
/// page holds `rows * 3` of them.
pub const ROW_GROUPS_PER_RECORD: u32 = 3;

/// Counts rendered row-group containers; used as the proxy signal for
/// "rendering has caught up with the last configuration change".
pub const ROW_GROUP_COUNT_EXPR: &str =
    "document.querySelectorAll('#results > table > tbody:nth-child(1) > tbody').length";

/// Collects every result row's raw `innerHTML` in document order. Order is
/// load-bearing: index `3k` is a result fragment, `3k+1` stats, `3k+2` icons.
pub const ROWS_SCRIPT: &str = "\
Array.from(document.querySelectorAll('#results > table > tbody:nth-child(1) > tbody > tr'))\
.map(tr => tr.innerHTML.trim())";

/// True when a "next page" control is present.
pub const NEXT_CONTROL_SCRIPT: &str =
    "document.querySelector('#results a.nextPage') !== null";

/// Reads the pagination affordance. Prefers dedicated current/total elements;
/// also carries the results-summary sentence so the engine can fall back to
/// text parsing when the numbers are absent (a documented compatibility shim
/// for older renderings of the listing).
pub const PAGE_INDICATOR_SCRIPT: &str = r#"(() => {
    const cur = document.querySelector('#results .pageNumber');
    const total = document.querySelector('#results .pageCount');
    const summary = document.querySelector('#results .resultsSummary');
    return {
        current: cur ? Number(cur.textContent) : null,
        total: total ? Number(total.textContent) : null,
        summary: summary ? summary.textContent.trim() : ''
    };
})()"#;

/// Row-group count a settled page shows for the given page-size setting.
pub fn expected_row_groups(page_size: PageSize) -> u32 {
    page_size.rows() * ROW_GROUPS_PER_RECORD
}

/// Expression that is truthy once the rendered row-group count has stabilized
/// at the count implied by the page-size setting.
pub fn stabilized_expr(expected: u32) -> String {
    format!("{ROW_GROUP_COUNT_EXPR} === {expected}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifty_rows_means_150_row_groups() {
        assert_eq!(expected_row_groups(PageSize::Fifty), 150);
    }

    #[test]
    fn test_stabilization_target_follows_page_size() {
        assert_eq!(expected_row_groups(PageSize::Ten), 30);
        assert_eq!(expected_row_groups(PageSize::TwentyFive), 75);
        assert!(stabilized_expr(75).ends_with("=== 75"));
    }
}
