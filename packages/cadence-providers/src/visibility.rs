/// User privilege bit: the account is publicly visible.
pub const USER_PUBLIC: u64 = 1;
/// Token privilege bit: the bearer may manage, and therefore see, any user.
pub const TOKEN_MANAGE_USERS: u64 = 1 << 3;

/// The authenticated caller, as resolved by the transport layer. Carries
/// only what the retrieval core needs: an id for `self` lookups and the
/// opaque token privilege bitmask.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewer {
	pub user_id: i64,
	pub token_privileges: u64,
}

impl Viewer {
	/// An unauthenticated caller: sees public rows only.
	pub fn public() -> Self {
		Self::default()
	}
}

/// Supplies ready-made boolean SQL fragments gating row visibility. The
/// retrieval core conjoins the fragments as-is and never inspects privilege
/// bits itself; this is the one place they are interpreted.
pub trait Visibility
where
	Self: Send + Sync,
{
	/// Fragment restricting `users` rows to what the viewer may see.
	/// Contains no caller-supplied input.
	fn user_clause(&self, viewer: &Viewer) -> String;

	/// Whether a fetched user row with the given privilege mask is visible
	/// to the viewer.
	fn user_visible(&self, viewer: &Viewer, user_privileges: u64) -> bool;

	fn can_manage_users(&self, viewer: &Viewer) -> bool;
}

/// Default gate: public accounts for everyone, everything for managers.
pub struct PublicGate;

impl Visibility for PublicGate {
	fn user_clause(&self, viewer: &Viewer) -> String {
		if self.can_manage_users(viewer) {
			"1".to_string()
		} else {
			format!("users.privileges & {USER_PUBLIC} > 0")
		}
	}

	fn user_visible(&self, viewer: &Viewer, user_privileges: u64) -> bool {
		user_privileges & USER_PUBLIC != 0 || self.can_manage_users(viewer)
	}

	fn can_manage_users(&self, viewer: &Viewer) -> bool {
		viewer.token_privileges & TOKEN_MANAGE_USERS != 0
	}
}
