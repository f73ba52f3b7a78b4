//! Set references and the widget parameters they are derived from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Names the set to load: `workspace/object[/version]`.
///
/// Workspace and object may be numeric ids or names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SetReference {
    workspace: String,
    object: String,
    version: Option<u64>,
}

impl SetReference {
    pub fn new(
        workspace: impl Into<String>,
        object: impl Into<String>,
        version: Option<u64>,
    ) -> Result<Self> {
        let workspace = workspace.into();
        let object = object.into();
        for (label, part) in [("workspace", &workspace), ("object", &object)] {
            if part.is_empty() || part.contains('/') {
                return Err(Error::InvalidReference(format!(
                    "{} component '{}' must be non-empty and contain no '/'",
                    label, part
                )));
            }
        }
        Ok(Self {
            workspace,
            object,
            version,
        })
    }

    /// Build the reference from widget parameters.
    pub fn from_params(params: &WidgetParams) -> Result<Self> {
        Self::new(
            params.workspace_id.clone(),
            params.object_id.clone(),
            params.object_version,
        )
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn version(&self) -> Option<u64> {
        self.version
    }
}

impl fmt::Display for SetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(v) => write!(f, "{}/{}/{}", self.workspace, self.object, v),
            None => write!(f, "{}/{}", self.workspace, self.object),
        }
    }
}

impl FromStr for SetReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [ws, obj] => Self::new(*ws, *obj, None),
            [ws, obj, ver] => {
                let version = ver.parse::<u64>().map_err(|_| {
                    Error::InvalidReference(format!("version '{}' in '{}' is not a number", ver, s))
                })?;
                Self::new(*ws, *obj, Some(version))
            }
            _ => Err(Error::InvalidReference(format!(
                "expected workspace/object[/version], got '{}'",
                s
            ))),
        }
    }
}

/// Parameters a widget is started with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetParams {
    #[serde(rename = "workspaceId")]
    pub workspace_id: String,
    #[serde(rename = "objectId")]
    pub object_id: String,
    #[serde(rename = "objectVersion", default, skip_serializing_if = "Option::is_none")]
    pub object_version: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_and_without_version() {
        let r = SetReference::new("11700", "set_o_reads", Some(1)).unwrap();
        assert_eq!(r.to_string(), "11700/set_o_reads/1");

        let r = SetReference::new("11700", "4", None).unwrap();
        assert_eq!(r.to_string(), "11700/4");
    }

    #[test]
    fn test_from_str() {
        let r: SetReference = "11700/set_o_reads/1".parse().unwrap();
        assert_eq!(r.workspace(), "11700");
        assert_eq!(r.object(), "set_o_reads");
        assert_eq!(r.version(), Some(1));

        assert!("11700".parse::<SetReference>().is_err());
        assert!("1/2/3/4".parse::<SetReference>().is_err());
        assert!("1/2/latest".parse::<SetReference>().is_err());
        assert!("/2".parse::<SetReference>().is_err());
    }

    #[test]
    fn test_from_params() {
        let params: WidgetParams = serde_json::from_value(serde_json::json!({
            "workspaceId": "11700",
            "objectId": "set_o_reads",
            "objectVersion": 1,
        }))
        .unwrap();
        let r = SetReference::from_params(&params).unwrap();
        assert_eq!(r.to_string(), "11700/set_o_reads/1");
    }

    #[test]
    fn test_from_params_requires_ids() {
        let params = WidgetParams {
            workspace_id: "11700".into(),
            ..Default::default()
        };
        assert!(matches!(
            SetReference::from_params(&params),
            Err(Error::InvalidReference(_))
        ));
    }
}
