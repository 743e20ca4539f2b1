use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Filter values equal to one of these mean "no filter" and are dropped.
pub const ALL_SENTINELS: [&str; 2] = ["all", ""];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: None,
            direction: SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn get(self) -> u32 {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }

    pub fn from_value(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.get() == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Choice(String),
    Date(NaiveDate),
}

impl FilterValue {
    pub fn as_param(&self) -> String {
        match self {
            FilterValue::Text(text) => text.trim().to_string(),
            FilterValue::Choice(choice) => choice.clone(),
            FilterValue::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn is_all(&self) -> bool {
        match self {
            FilterValue::Text(text) | FilterValue::Choice(text) => {
                ALL_SENTINELS.contains(&text.trim())
            }
            FilterValue::Date(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryChange {
    Search(String),
    Filter(String, FilterValue),
    ClearFilter(String),
    ClearAll,
    PageSize(PageSize),
    ToggleSort(String),
    Page(u32),
    NextPage { total_count: u64 },
    PrevPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    search_text: String,
    filters: BTreeMap<String, FilterValue>,
    sort: SortSpec,
    page: u32,
    page_size: PageSize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl ListQuery {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            search_text: String::new(),
            filters: BTreeMap::new(),
            sort: SortSpec::default(),
            page: 1,
            page_size,
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn filters(&self) -> &BTreeMap<String, FilterValue> {
        &self.filters
    }

    pub fn filter(&self, name: &str) -> Option<&FilterValue> {
        self.filters.get(name)
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page = 1;
    }

    /// Sentinel values ("all", "") remove the filter instead of storing it.
    pub fn set_filter(&mut self, name: impl Into<String>, value: FilterValue) {
        let name = name.into();
        if value.is_all() {
            self.filters.remove(&name);
        } else {
            self.filters.insert(name, value);
        }
        self.page = 1;
    }

    pub fn clear_filter(&mut self, name: &str) {
        self.filters.remove(name);
        self.page = 1;
    }

    pub fn clear_all(&mut self) {
        self.search_text.clear();
        self.filters.clear();
        self.sort = SortSpec::default();
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    pub fn toggle_sort(&mut self, key: impl Into<String>) {
        let key = key.into();
        if self.sort.key.as_deref() == Some(key.as_str()) {
            self.sort.direction = self.sort.direction.flipped();
        } else {
            self.sort = SortSpec {
                key: Some(key),
                direction: SortDirection::Asc,
            };
        }
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn page_count(&self, total_count: u64) -> u32 {
        page_count(total_count, self.page_size)
    }

    pub fn apply(&mut self, change: QueryChange) {
        match change {
            QueryChange::Search(text) => self.set_search(text),
            QueryChange::Filter(name, value) => self.set_filter(name, value),
            QueryChange::ClearFilter(name) => self.clear_filter(&name),
            QueryChange::ClearAll => self.clear_all(),
            QueryChange::PageSize(size) => self.set_page_size(size),
            QueryChange::ToggleSort(key) => self.toggle_sort(key),
            QueryChange::Page(page) => self.set_page(page),
            QueryChange::NextPage { total_count } => {
                let last = self.page_count(total_count);
                self.set_page((self.page + 1).min(last));
            }
            QueryChange::PrevPage => self.set_page(self.page.saturating_sub(1)),
        }
    }
}

pub fn page_count(total_count: u64, page_size: PageSize) -> u32 {
    let size = u64::from(page_size.get());
    let pages = total_count.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
