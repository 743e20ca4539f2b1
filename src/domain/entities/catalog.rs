use crate::domain::entities::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Backend slices: `page`/`per_page` go out, `meta.total` comes back.
    Server,
    /// Backend returns the whole matching set; sorting and slicing happen here.
    Client,
}

/// How a column compares when sorted locally, and what a missing value sorts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    /// Ordinal string comparison; missing sorts as `""`.
    Text,
    /// Numeric comparison; missing or unparsable sorts as `0`.
    Number,
    /// `YYYY-MM-DD` prefix comparison; missing sorts before every date.
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub sort: Option<SortKind>,
    pub editable: bool,
}

const fn column(key: &'static str, label: &'static str, sort: SortKind) -> ColumnSpec {
    ColumnSpec {
        key,
        label,
        sort: Some(sort),
        editable: true,
    }
}

const fn readonly(key: &'static str, label: &'static str, sort: SortKind) -> ColumnSpec {
    ColumnSpec {
        key,
        label,
        sort: Some(sort),
        editable: false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Choice(&'static [(&'static str, &'static str)]),
    Date,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    ToggleFlag {
        field: &'static str,
        label: &'static str,
    },
    SetStatus {
        value: &'static str,
        label: &'static str,
    },
    Delete,
    ViewDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEndpoint {
    pub path: &'static str,
    pub key_field: &'static str,
    pub pagination: PaginationMode,
    pub local_filtering: bool,
    pub search_fields: &'static [&'static str],
    pub columns: &'static [ColumnSpec],
    pub filters: &'static [FilterSpec],
    pub actions: &'static [RowAction],
}

impl ListEndpoint {
    pub fn column(&self, key: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.key == key)
    }

    pub fn sort_kind(&self, key: &str) -> SortKind {
        self.column(key)
            .and_then(|column| column.sort)
            .unwrap_or(SortKind::Text)
    }

    pub fn item_path(&self, key: &impl std::fmt::Display) -> String {
        format!("{}/{}", self.path, key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Packages,
    Hotels,
    Flights,
    Airlines,
    Banks,
    BlogPosts,
    BlogCategories,
    BlogTags,
    Orders,
    Users,
    TravelAgents,
}

const PUBLISH_STATUS: &[(&str, &str)] = &[
    ("all", "All"),
    ("published", "Published"),
    ("draft", "Draft"),
];
const ACTIVE_STATUS: &[(&str, &str)] = &[
    ("all", "All"),
    ("active", "Active"),
    ("inactive", "Inactive"),
];
const ORDER_STATUS: &[(&str, &str)] = &[
    ("all", "All"),
    ("pending", "Pending"),
    ("approved", "Approved"),
    ("cancelled", "Cancelled"),
];
const PACKAGE_TYPE: &[(&str, &str)] = &[("all", "All"), ("umrah", "Umrah"), ("hajj", "Hajj")];
const USER_ROLE: &[(&str, &str)] = &[
    ("all", "All"),
    ("admin", "Admin"),
    ("travel_agent", "Travel agent"),
    ("user", "User"),
];

const PACKAGES: ListEndpoint = ListEndpoint {
    path: "packages",
    key_field: "id",
    pagination: PaginationMode::Server,
    local_filtering: false,
    search_fields: &["name"],
    columns: &[
        column("name", "Name", SortKind::Text),
        column("type", "Type", SortKind::Text),
        column("price", "Price", SortKind::Number),
        column("departure_date", "Departure", SortKind::Date),
        readonly("status", "Status", SortKind::Text),
        readonly("is_featured", "Featured", SortKind::Number),
    ],
    filters: &[
        FilterSpec {
            name: "status",
            label: "Status",
            kind: FilterKind::Choice(PUBLISH_STATUS),
        },
        FilterSpec {
            name: "type",
            label: "Type",
            kind: FilterKind::Choice(PACKAGE_TYPE),
        },
    ],
    actions: &[
        RowAction::ViewDetail,
        RowAction::ToggleFlag {
            field: "is_featured",
            label: "Featured",
        },
        RowAction::SetStatus {
            value: "published",
            label: "Publish",
        },
        RowAction::SetStatus {
            value: "draft",
            label: "Unpublish",
        },
        RowAction::Delete,
    ],
};

const HOTELS: ListEndpoint = ListEndpoint {
    path: "hotels",
    key_field: "id",
    pagination: PaginationMode::Client,
    local_filtering: false,
    search_fields: &["name", "city"],
    columns: &[
        column("name", "Name", SortKind::Text),
        column("city", "City", SortKind::Text),
        column("stars", "Stars", SortKind::Number),
        column("distance_to_haram", "Distance (m)", SortKind::Number),
    ],
    filters: &[FilterSpec {
        name: "city",
        label: "City",
        kind: FilterKind::Choice(&[("all", "All"), ("makkah", "Makkah"), ("madinah", "Madinah")]),
    }],
    actions: &[RowAction::Delete],
};

const FLIGHTS: ListEndpoint = ListEndpoint {
    path: "flights",
    key_field: "id",
    pagination: PaginationMode::Client,
    local_filtering: false,
    search_fields: &["flight_number", "origin", "destination"],
    columns: &[
        column("flight_number", "Flight", SortKind::Text),
        column("airline_name", "Airline", SortKind::Text),
        column("origin", "From", SortKind::Text),
        column("destination", "To", SortKind::Text),
        column("departure_at", "Departure", SortKind::Date),
    ],
    filters: &[FilterSpec {
        name: "airline",
        label: "Airline",
        kind: FilterKind::Text,
    }],
    actions: &[RowAction::Delete],
};

const AIRLINES: ListEndpoint = ListEndpoint {
    path: "airlines",
    key_field: "id",
    pagination: PaginationMode::Client,
    local_filtering: true,
    search_fields: &["name", "code"],
    columns: &[
        column("name", "Name", SortKind::Text),
        column("code", "Code", SortKind::Text),
    ],
    filters: &[],
    actions: &[RowAction::Delete],
};

const BANKS: ListEndpoint = ListEndpoint {
    path: "banks",
    key_field: "id",
    pagination: PaginationMode::Client,
    local_filtering: true,
    search_fields: &["bank_name", "account_name", "account_number"],
    columns: &[
        column("bank_name", "Bank", SortKind::Text),
        column("account_name", "Account name", SortKind::Text),
        column("account_number", "Account number", SortKind::Text),
    ],
    filters: &[],
    actions: &[RowAction::Delete],
};

const BLOG_POSTS: ListEndpoint = ListEndpoint {
    path: "blog/posts",
    key_field: "id",
    pagination: PaginationMode::Server,
    local_filtering: false,
    search_fields: &["title"],
    columns: &[
        column("title", "Title", SortKind::Text),
        readonly("category_name", "Category", SortKind::Text),
        readonly("published_at", "Published", SortKind::Date),
        readonly("status", "Status", SortKind::Text),
        readonly("is_featured", "Featured", SortKind::Number),
    ],
    filters: &[
        FilterSpec {
            name: "status",
            label: "Status",
            kind: FilterKind::Choice(PUBLISH_STATUS),
        },
        FilterSpec {
            name: "category",
            label: "Category",
            kind: FilterKind::Text,
        },
    ],
    actions: &[
        RowAction::ToggleFlag {
            field: "is_featured",
            label: "Featured",
        },
        RowAction::Delete,
    ],
};

const BLOG_CATEGORIES: ListEndpoint = ListEndpoint {
    path: "blog/categories",
    key_field: "slug",
    pagination: PaginationMode::Client,
    local_filtering: true,
    search_fields: &["name", "slug"],
    columns: &[
        column("name", "Name", SortKind::Text),
        column("slug", "Slug", SortKind::Text),
        readonly("posts_count", "Posts", SortKind::Number),
    ],
    filters: &[],
    actions: &[RowAction::Delete],
};

const BLOG_TAGS: ListEndpoint = ListEndpoint {
    path: "blog/tags",
    key_field: "slug",
    pagination: PaginationMode::Client,
    local_filtering: true,
    search_fields: &["name", "slug"],
    columns: &[
        column("name", "Name", SortKind::Text),
        column("slug", "Slug", SortKind::Text),
    ],
    filters: &[],
    actions: &[RowAction::Delete],
};

const ORDERS: ListEndpoint = ListEndpoint {
    path: "orders",
    key_field: "id",
    pagination: PaginationMode::Server,
    local_filtering: false,
    search_fields: &["order_number", "customer_name"],
    columns: &[
        readonly("order_number", "Order", SortKind::Text),
        readonly("customer_name", "Customer", SortKind::Text),
        readonly("package_name", "Package", SortKind::Text),
        readonly("total_price", "Total", SortKind::Number),
        readonly("created_at", "Created", SortKind::Date),
        readonly("status", "Status", SortKind::Text),
    ],
    filters: &[
        FilterSpec {
            name: "status",
            label: "Status",
            kind: FilterKind::Choice(ORDER_STATUS),
        },
        FilterSpec {
            name: "created_from",
            label: "Created from",
            kind: FilterKind::Date,
        },
    ],
    actions: &[
        RowAction::SetStatus {
            value: "approved",
            label: "Approve",
        },
        RowAction::SetStatus {
            value: "cancelled",
            label: "Cancel",
        },
    ],
};

const USERS: ListEndpoint = ListEndpoint {
    path: "users",
    key_field: "id",
    pagination: PaginationMode::Server,
    local_filtering: false,
    search_fields: &["name", "email"],
    columns: &[
        column("name", "Name", SortKind::Text),
        column("email", "Email", SortKind::Text),
        readonly("role", "Role", SortKind::Text),
        readonly("status", "Status", SortKind::Text),
        readonly("created_at", "Joined", SortKind::Date),
    ],
    filters: &[
        FilterSpec {
            name: "role",
            label: "Role",
            kind: FilterKind::Choice(USER_ROLE),
        },
        FilterSpec {
            name: "status",
            label: "Status",
            kind: FilterKind::Choice(ACTIVE_STATUS),
        },
    ],
    actions: &[
        RowAction::SetStatus {
            value: "active",
            label: "Activate",
        },
        RowAction::SetStatus {
            value: "inactive",
            label: "Deactivate",
        },
        RowAction::Delete,
    ],
};

const TRAVEL_AGENTS: ListEndpoint = ListEndpoint {
    path: "travel-agents",
    key_field: "id",
    pagination: PaginationMode::Client,
    local_filtering: true,
    search_fields: &["name", "email", "company_name"],
    columns: &[
        column("name", "Name", SortKind::Text),
        column("company_name", "Company", SortKind::Text),
        column("email", "Email", SortKind::Text),
        readonly("packages_count", "Packages", SortKind::Number),
        readonly("status", "Status", SortKind::Text),
    ],
    filters: &[FilterSpec {
        name: "status",
        label: "Status",
        kind: FilterKind::Choice(ACTIVE_STATUS),
    }],
    actions: &[
        RowAction::SetStatus {
            value: "active",
            label: "Activate",
        },
        RowAction::SetStatus {
            value: "inactive",
            label: "Deactivate",
        },
        RowAction::Delete,
    ],
};

impl ResourceKind {
    pub const ALL: [ResourceKind; 11] = [
        ResourceKind::Packages,
        ResourceKind::Hotels,
        ResourceKind::Flights,
        ResourceKind::Airlines,
        ResourceKind::Banks,
        ResourceKind::BlogPosts,
        ResourceKind::BlogCategories,
        ResourceKind::BlogTags,
        ResourceKind::Orders,
        ResourceKind::Users,
        ResourceKind::TravelAgents,
    ];

    pub fn endpoint(self) -> ListEndpoint {
        match self {
            ResourceKind::Packages => PACKAGES,
            ResourceKind::Hotels => HOTELS,
            ResourceKind::Flights => FLIGHTS,
            ResourceKind::Airlines => AIRLINES,
            ResourceKind::Banks => BANKS,
            ResourceKind::BlogPosts => BLOG_POSTS,
            ResourceKind::BlogCategories => BLOG_CATEGORIES,
            ResourceKind::BlogTags => BLOG_TAGS,
            ResourceKind::Orders => ORDERS,
            ResourceKind::Users => USERS,
            ResourceKind::TravelAgents => TRAVEL_AGENTS,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ResourceKind::Packages => "Packages",
            ResourceKind::Hotels => "Hotels",
            ResourceKind::Flights => "Flights",
            ResourceKind::Airlines => "Airlines",
            ResourceKind::Banks => "Banks",
            ResourceKind::BlogPosts => "Blog posts",
            ResourceKind::BlogCategories => "Blog categories",
            ResourceKind::BlogTags => "Blog tags",
            ResourceKind::Orders => "Orders",
            ResourceKind::Users => "Users",
            ResourceKind::TravelAgents => "Travel agents",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Packages => "Package",
            ResourceKind::Hotels => "Hotel",
            ResourceKind::Flights => "Flight",
            ResourceKind::Airlines => "Airline",
            ResourceKind::Banks => "Bank account",
            ResourceKind::BlogPosts => "Post",
            ResourceKind::BlogCategories => "Category",
            ResourceKind::BlogTags => "Tag",
            ResourceKind::Orders => "Order",
            ResourceKind::Users => "User",
            ResourceKind::TravelAgents => "Travel agent",
        }
    }

    /// Orders come from customers; the back-office never creates them.
    pub fn can_create(self) -> bool {
        !matches!(self, ResourceKind::Orders)
    }

    pub fn visible_to(self, role: Role) -> bool {
        match role {
            Role::Admin => true,
            Role::TravelAgent => matches!(
                self,
                ResourceKind::Packages
                    | ResourceKind::Hotels
                    | ResourceKind::Flights
                    | ResourceKind::Orders
            ),
            Role::User => false,
        }
    }
}
