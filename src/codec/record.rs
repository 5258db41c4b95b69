use serde::Serialize;

/// A key/value pair from a response. Never contains the `;` delimiter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Property {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One SQL Server instance described by a response.
///
/// Well-known keys land in their own fields; anything else is kept in
/// `props` in the order it arrived. Empty strings mean "not present".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstanceRecord {
    /// Text this record was decoded from, delimiters included.
    #[serde(skip)]
    pub raw: String,

    pub server: String,
    pub instance: String,
    /// "Yes" or "No" as sent by the server.
    pub clustered: String,
    pub version: String,

    pub tcp: String,
    pub np: String,

    pub props: Vec<Property>,
}

impl InstanceRecord {
    pub const SERVER_NAME: &'static str = "ServerName";
    pub const INSTANCE_NAME: &'static str = "InstanceName";
    pub const IS_CLUSTERED: &'static str = "IsClustered";
    pub const VERSION: &'static str = "Version";
    pub const TCP: &'static str = "tcp";
    pub const NP: &'static str = "np";

    /// Routes a property to its field. Matching is exact and case-sensitive.
    pub fn add(&mut self, prop: Property) {
        match prop.key.as_str() {
            Self::SERVER_NAME => self.server = prop.value,
            Self::INSTANCE_NAME => self.instance = prop.value,
            Self::IS_CLUSTERED => self.clustered = prop.value,
            Self::VERSION => self.version = prop.value,
            Self::TCP => self.tcp = prop.value,
            Self::NP => self.np = prop.value,
            _ => self.props.push(prop),
        }
    }

    pub fn is_clustered(&self) -> bool {
        self.clustered == "Yes"
    }

    /// `server\instance`, or just `server` for a default instance.
    pub fn display_name(&self) -> String {
        if self.instance.is_empty() {
            self.server.clone()
        } else {
            format!("{}\\{}", self.server, self.instance)
        }
    }

    /// True when no property at all was decoded into this record.
    pub fn is_empty(&self) -> bool {
        self.server.is_empty()
            && self.instance.is_empty()
            && self.clustered.is_empty()
            && self.version.is_empty()
            && self.tcp.is_empty()
            && self.np.is_empty()
            && self.props.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.props
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
}
