use std::cell::RefCell;
use studytrack_core::{
    can_edit, AuthUser, Resource, ResourceApi, ResourceCatalog, ResourceDraft, ResourceError,
    ResourceResult,
};

/// In-process stand-in for the remote collection.
#[derive(Default)]
struct FakeApi {
    items: RefCell<Vec<Resource>>,
    next_id: RefCell<u32>,
    fail_with: RefCell<Option<u16>>,
    requests: RefCell<Vec<String>>,
}

impl FakeApi {
    fn with_items(items: Vec<Resource>) -> Self {
        let api = Self::default();
        *api.items.borrow_mut() = items;
        api
    }

    fn fail_next(&self, status: u16) {
        *self.fail_with.borrow_mut() = Some(status);
    }

    fn check(&self, request: &str) -> ResourceResult<()> {
        self.requests.borrow_mut().push(request.to_string());
        match self.fail_with.borrow_mut().take() {
            Some(status) => Err(ResourceError::Status(status)),
            None => Ok(()),
        }
    }
}

impl ResourceApi for FakeApi {
    fn list(&self) -> ResourceResult<Vec<Resource>> {
        self.check("GET")?;
        Ok(self.items.borrow().clone())
    }

    fn create(&self, payload: &Resource) -> ResourceResult<Resource> {
        self.check("POST")?;
        let mut next_id = self.next_id.borrow_mut();
        *next_id += 1;
        let created = Resource {
            id: format!("srv-{next_id}"),
            ..payload.clone()
        };
        self.items.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn update(&self, id: &str, draft: &ResourceDraft) -> ResourceResult<Resource> {
        self.check("PUT")?;
        let mut items = self.items.borrow_mut();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(ResourceError::Status(404))?;
        item.title = draft.title.clone();
        item.description = draft.description.clone();
        item.url = draft.url.clone();
        Ok(item.clone())
    }

    fn delete(&self, id: &str) -> ResourceResult<()> {
        self.check("DELETE")?;
        self.items.borrow_mut().retain(|item| item.id != id);
        Ok(())
    }
}

fn resource(id: &str, owner: &str) -> Resource {
    Resource {
        id: id.to_string(),
        title: format!("Title {id}"),
        description: "Shared link".to_string(),
        url: format!("https://example.com/{id}"),
        owner_email: owner.to_string(),
        created_at: Some("2026-01-01T00:00:00.000Z".to_string()),
    }
}

fn user(email: &str) -> AuthUser {
    AuthUser {
        email: email.to_string(),
    }
}

#[test]
fn fetch_replaces_list_and_failure_records_message() {
    let api = FakeApi::with_items(vec![resource("r1", "a@x.io"), resource("r2", "b@x.io")]);
    let mut catalog = ResourceCatalog::new(&api);

    assert!(catalog.fetch());
    assert_eq!(catalog.resources().len(), 2);
    assert!(!catalog.is_loading());
    assert_eq!(catalog.error(), None);

    api.fail_next(500);
    assert!(!catalog.fetch());
    assert_eq!(catalog.error(), Some("Failed to fetch resources"));
    assert_eq!(catalog.resources().len(), 2);
    assert!(!catalog.is_loading());
}

#[test]
fn create_prepends_server_record_with_owner() {
    let api = FakeApi::with_items(vec![resource("r1", "a@x.io")]);
    let mut catalog = ResourceCatalog::new(&api);
    catalog.fetch();

    let owner = user("me@x.io");
    let created = catalog
        .create(
            &ResourceDraft::new("Guide", "Step by step", "https://guide.dev"),
            Some(&owner),
        )
        .unwrap();

    assert_eq!(created.id, "srv-1");
    assert_eq!(created.owner_email, "me@x.io");
    assert!(created.created_at.is_some());
    assert_eq!(catalog.resources()[0].id, "srv-1");

    let anonymous = catalog
        .create(&ResourceDraft::new("Anon", "", "https://a.dev"), None)
        .unwrap();
    assert_eq!(anonymous.owner_email, "");
}

#[test]
fn failed_create_and_update_leave_state_untouched() {
    let api = FakeApi::with_items(vec![resource("r1", "a@x.io")]);
    let mut catalog = ResourceCatalog::new(&api);
    catalog.fetch();
    let before = catalog.resources().to_vec();

    api.fail_next(400);
    assert!(catalog
        .create(&ResourceDraft::new("x", "y", "z"), None)
        .is_none());
    assert_eq!(catalog.error(), Some("Failed to create resource"));

    api.fail_next(503);
    assert!(catalog
        .update("r1", &ResourceDraft::new("x", "y", "z"))
        .is_none());
    assert_eq!(catalog.error(), Some("Failed to update resource"));
    assert_eq!(catalog.resources(), &before[..]);
}

#[test]
fn update_merges_and_delete_removes_after_success() {
    let api = FakeApi::with_items(vec![resource("r1", "a@x.io"), resource("r2", "a@x.io")]);
    let mut catalog = ResourceCatalog::new(&api);
    catalog.fetch();

    catalog
        .update("r1", &ResourceDraft::new("Renamed", "New text", "https://new.dev"))
        .unwrap();
    let updated = catalog.get("r1").unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.owner_email, "a@x.io");

    api.fail_next(500);
    assert!(!catalog.delete("r2"));
    assert_eq!(catalog.error(), Some("Failed to delete resource"));
    assert!(catalog.get("r2").is_some());

    assert!(catalog.delete("r2"));
    assert_eq!(catalog.error(), None);
    assert!(catalog.get("r2").is_none());
    assert_eq!(
        *api.requests.borrow(),
        vec!["GET", "PUT", "DELETE", "DELETE"]
    );
}

#[test]
fn ownership_filters_and_edit_permission() {
    let api = FakeApi::with_items(vec![
        resource("r1", "a@x.io"),
        resource("r2", "b@x.io"),
        resource("r3", "a@x.io"),
    ]);
    let mut catalog = ResourceCatalog::new(&api);
    catalog.fetch();

    let mine: Vec<&str> = catalog
        .owned_by("a@x.io")
        .iter()
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(mine, vec!["r1", "r3"]);
    assert_eq!(catalog.owned_by("").len(), 3);

    let r1 = catalog.get("r1").unwrap();
    assert!(can_edit(r1, Some(&user("a@x.io"))));
    assert!(!can_edit(r1, Some(&user("b@x.io"))));
    assert!(!can_edit(r1, None));
}
