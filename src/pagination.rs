//! Paging of the dashboard transaction list.

use maud::{Markup, html};

/// The page sizes a user may choose from.
pub const PAGE_SIZES: [u64; 3] = [10, 25, 50];

/// The page size used when the request does not name a valid one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// The maximum number of page links shown around the current page.
pub const MAX_PAGE_LINKS: u64 = 5;

/// Read a page size from a query string value, falling back to [DEFAULT_PAGE_SIZE]
/// for anything other than one of [PAGE_SIZES].
pub fn page_size_from_query(value: Option<&str>) -> u64 {
    value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|size| PAGE_SIZES.contains(size))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// The number of pages needed for `item_count` items, at least one.
pub fn page_count(item_count: usize, page_size: u64) -> u64 {
    (item_count as u64).div_ceil(page_size.max(1)).max(1)
}

/// Read a page number from a query string value and clamp it to `1..=page_count`.
pub fn page_from_query(value: Option<&str>, page_count: u64) -> u64 {
    value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(1)
        .clamp(1, page_count.max(1))
}

/// One element of the pagination bar.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    /// A link to another page.
    Page(u64),
    /// The page being shown.
    CurrPage(u64),
    /// A gap in the page numbers.
    Ellipsis,
    /// A link to the following page.
    NextButton(u64),
    /// A link to the preceding page.
    BackButton(u64),
}

/// Lay out the pagination bar for `curr_page` out of `page_count` pages,
/// showing at most `max_pages` numbered links besides the first and last page.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

/// Render the pagination bar, where `page_url` gives the link for a page number.
///
/// Nothing is rendered when there is a single page.
pub fn pagination_view(indicators: &[PaginationIndicator], page_url: impl Fn(u64) -> String) -> Markup {
    let has_other_pages = indicators
        .iter()
        .any(|indicator| !matches!(indicator, PaginationIndicator::CurrPage(_)));

    let link_style = "block px-3 py-2 rounded-sm text-blue-600 hover:underline dark:text-blue-400";

    html! {
        @if has_other_pages {
            nav class="pagination flex justify-center" aria-label="Paginação"
            {
                ul class="pagination flex items-center gap-1 p-0 m-0"
                {
                    @for indicator in indicators {
                        li {
                            @match indicator {
                                PaginationIndicator::BackButton(page) => {
                                    a href=(page_url(*page)) role="button" class=(link_style) { "Anterior" }
                                }
                                PaginationIndicator::Page(page) => {
                                    a href=(page_url(*page)) class=(link_style) { (page) }
                                }
                                PaginationIndicator::CurrPage(page) => {
                                    span
                                        aria-current="page"
                                        class="block px-3 py-2 rounded-sm font-bold text-black dark:text-white"
                                    { (page) }
                                }
                                PaginationIndicator::Ellipsis => {
                                    span class="px-2 text-gray-500" { "…" }
                                }
                                PaginationIndicator::NextButton(page) => {
                                    a href=(page_url(*page)) role="button" class=(link_style) { "Próxima" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
