//! Classification of survey row types

/// Field types built from a single survey row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Decimal,
    Integer,
    Text,
    Boolean,
    Note,
    Date,
    Time,
    Calculate,
    Table,
    Barcode,
    Geopoint,
    File,
    Image,
    Video,
    Range,
}

impl FieldKind {
    fn from_type(s: &str) -> Option<Self> {
        Some(match s {
            "decimal" => Self::Decimal,
            "integer" => Self::Integer,
            "text" => Self::Text,
            "boolean" => Self::Boolean,
            "note" => Self::Note,
            "date" => Self::Date,
            "time" => Self::Time,
            "calculate" => Self::Calculate,
            "table" => Self::Table,
            "barcode" => Self::Barcode,
            "geopoint" => Self::Geopoint,
            "file" => Self::File,
            "image" => Self::Image,
            "video" => Self::Video,
            "range" => Self::Range,
            _ => return None,
        })
    }
}

/// The meaning of the `type` cell of a survey row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowType<'a> {
    BeginGroup,
    EndGroup,
    BeginRepeat,
    EndRepeat,
    Field(FieldKind),
    /// `select_one <list>` or `select_multiple <list>`
    Select { multiple: bool, list: &'a str },
    /// Metadata collected by other xlsform tools, dropped here
    Ignored,
    /// A known xlsform type with no AJF counterpart
    Unsupported,
    Empty,
    Unknown,
}

const IGNORED: &[&str] = &[
    "start",
    "end",
    "today",
    "deviceid",
    "subscriberid",
    "simserial",
    "phonenumber",
    "username",
    "email",
];

const UNSUPPORTED: &[&str] = &[
    "geotrace",
    "geoshape",
    "datetime",
    "audio",
    "acknowledge",
    "hidden",
    "xml-external",
];

impl<'a> RowType<'a> {
    /// Classify a (canonicalized) type cell
    pub fn parse(s: &'a str) -> Self {
        match s {
            "" => return Self::Empty,
            "begin group" => return Self::BeginGroup,
            "end group" => return Self::EndGroup,
            "begin repeat" => return Self::BeginRepeat,
            "end repeat" => return Self::EndRepeat,
            _ => {}
        }
        if let Some(kind) = FieldKind::from_type(s) {
            return Self::Field(kind);
        }
        if let Some(list) = s.strip_prefix("select_one ") {
            return Self::Select {
                multiple: false,
                list,
            };
        }
        if let Some(list) = s.strip_prefix("select_multiple ") {
            return Self::Select {
                multiple: true,
                list,
            };
        }
        if IGNORED.contains(&s) {
            return Self::Ignored;
        }
        if UNSUPPORTED.contains(&s) || s.starts_with("rank ") {
            return Self::Unsupported;
        }
        Self::Unknown
    }

    pub fn is_begin(&self) -> bool {
        matches!(self, Self::BeginGroup | Self::BeginRepeat)
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::EndGroup | Self::EndRepeat)
    }

    /// A row that becomes a field node
    pub fn is_field(&self) -> bool {
        matches!(self, Self::Field(_) | Self::Select { .. })
    }

    /// Name of the choice list of a select row
    pub fn choice_list(&self) -> Option<&'a str> {
        match self {
            Self::Select { list, .. } => Some(list),
            _ => None,
        }
    }
}
