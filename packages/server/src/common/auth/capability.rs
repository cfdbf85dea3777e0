/// Capabilities on the members site
///
/// The site is admin-managed: members only read published pages, so every
/// capability here gates an administrative operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCapability {
    /// Create, edit and delete pages (including generated drafts)
    ManagePages,

    /// Approve, reject and import members
    ManageMembers,

    /// Import spreadsheet tabs and trigger re-sync sweeps
    ImportSheets,

    /// Full admin access to all operations
    FullAdmin,
}

impl AdminCapability {
    /// Check if this capability requires admin access
    pub fn requires_admin(&self) -> bool {
        // All capabilities in this system require admin access
        true
    }
}
