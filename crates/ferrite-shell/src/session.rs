use ferrite_fs::User;
use std::collections::HashMap;

/// In-memory user database for one interactive session. This is the
/// identity collaborator: the file layer only ever sees the `User`
/// values handed out here and never creates its own.
pub struct Session {
    users: HashMap<String, User>,
    current: String,
}

impl Session {
    /// Every session starts as `root` (uid 0, gid 0).
    pub fn new() -> Self {
        let mut users = HashMap::new();
        users.insert("root".to_string(), User::new("root", 0, 0));
        Self {
            users,
            current: "root".to_string(),
        }
    }

    pub fn current(&self) -> &User {
        &self.users[&self.current]
    }

    /// Switch to `name`, creating the user on the fly if unknown (fresh
    /// uid starting at 1001, gid equal to uid). Returns true when a new
    /// user was created.
    pub fn switch(&mut self, name: &str) -> bool {
        let created = !self.users.contains_key(name);
        if created {
            let uid = 1000 + self.users.len() as u32;
            self.users
                .insert(name.to_string(), User::new(name, uid, uid));
        }
        self.current = name.to_string();
        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_as_root() {
        let session = Session::new();
        assert_eq!(session.current().name, "root");
        assert_eq!(session.current().uid, 0);
    }

    #[test]
    fn switch_creates_unknown_users_once() {
        let mut session = Session::new();
        assert!(session.switch("alice"));
        assert_eq!(session.current().uid, 1001);
        assert_eq!(session.current().gid, 1001);

        assert!(session.switch("bob"));
        assert_eq!(session.current().uid, 1002);

        // Back to an existing user: same identity, nothing created.
        assert!(!session.switch("alice"));
        assert_eq!(session.current().uid, 1001);
    }
}
