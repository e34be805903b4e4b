use crate::domain::Tag;

/// The transient branch an update run commits to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkBranch {
    pub name: String,
}

impl WorkBranch {
    /// Name the branch after the first tag of the run (e.g. `update-v1.4.2`)
    pub fn for_tags(prefix: &str, tags: &[Tag]) -> Option<Self> {
        tags.first().map(|first| WorkBranch {
            name: format!("{}{}", prefix, first.name),
        })
    }

    /// Full reference name (`refs/heads/<name>`)
    pub fn refname(&self) -> String {
        format!("refs/heads/{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_after_first_tag() {
        let tags = vec![Tag::new("v1.4.2"), Tag::new("v1.3.9")];
        let branch = WorkBranch::for_tags("update-", &tags).unwrap();
        assert_eq!(branch.name, "update-v1.4.2");
        assert_eq!(branch.refname(), "refs/heads/update-v1.4.2");
    }

    #[test]
    fn test_no_tags_no_branch() {
        assert!(WorkBranch::for_tags("update-", &[]).is_none());
    }
}
