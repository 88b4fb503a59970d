//! Service Registry CRUD Tests

#[cfg(test)]
mod tests {
	use campus_registry_adapter_sqlite::RegistryAdapterSqlite;
	use campus_types::prelude::*;
	use campus_types::registry_adapter::{RegistryAdapter, ServiceCreate, ServiceUpdate};
	use tempfile::TempDir;

	async fn create_test_adapter() -> CpResult<(RegistryAdapterSqlite, TempDir)> {
		let tmp_dir = TempDir::new().unwrap();
		let adapter = RegistryAdapterSqlite::new(tmp_dir.path().join("registry.db")).await?;
		Ok((adapter, tmp_dir))
	}

	fn entry(name: &str) -> ServiceCreate {
		ServiceCreate {
			name: name.into(),
			url: format!("http://{}.internal:8000", name).into(),
			description: None,
			is_active: true,
		}
	}

	#[tokio::test]
	async fn test_create_and_read() {
		let (adapter, _tmp) = create_test_adapter().await.expect("Failed to create adapter");

		let created =
			adapter.create_service(&entry("academics")).await.expect("Failed to create service");
		assert_eq!(created.name.as_ref(), "academics");
		assert!(created.is_active);
		assert!(created.updated_at.is_none());

		let read = adapter
			.read_service_by_name("academics")
			.await
			.expect("Failed to read service");
		assert_eq!(read.id, created.id);
		assert_eq!(read.url.as_ref(), "http://academics.internal:8000");
	}

	#[tokio::test]
	async fn test_duplicate_name_rejected() {
		let (adapter, _tmp) = create_test_adapter().await.expect("Failed to create adapter");

		adapter.create_service(&entry("library")).await.expect("Failed to create service");
		assert!(matches!(
			adapter.create_service(&entry("library")).await,
			Err(Error::AlreadyExists(_))
		));
	}

	#[tokio::test]
	async fn test_list_pagination_in_creation_order() {
		let (adapter, _tmp) = create_test_adapter().await.expect("Failed to create adapter");

		for name in ["one", "two", "three", "four"] {
			adapter.create_service(&entry(name)).await.expect("Failed to create service");
		}

		let page = adapter.list_services(1, 2).await.expect("Failed to list services");
		assert_eq!(page.len(), 2);
		assert_eq!(page[0].name.as_ref(), "two");
		assert_eq!(page[1].name.as_ref(), "three");

		let all = adapter.list_services(0, 100).await.expect("Failed to list services");
		assert_eq!(all.len(), 4);
	}

	#[tokio::test]
	async fn test_partial_update() {
		let (adapter, _tmp) = create_test_adapter().await.expect("Failed to create adapter");

		adapter.create_service(&entry("academics")).await.expect("Failed to create service");

		let patch = ServiceUpdate {
			url: Some("http://academics.internal:9000".into()),
			is_active: Some(false),
			..Default::default()
		};
		let updated =
			adapter.update_service("academics", &patch).await.expect("Failed to update service");

		// Untouched fields survive, touched ones change, updated_at is set
		assert_eq!(updated.name.as_ref(), "academics");
		assert_eq!(updated.url.as_ref(), "http://academics.internal:9000");
		assert!(!updated.is_active);
		assert!(updated.updated_at.is_some());
	}

	#[tokio::test]
	async fn test_rename_via_update() {
		let (adapter, _tmp) = create_test_adapter().await.expect("Failed to create adapter");

		adapter.create_service(&entry("old-name")).await.expect("Failed to create service");

		let patch = ServiceUpdate { name: Some("new-name".into()), ..Default::default() };
		let updated =
			adapter.update_service("old-name", &patch).await.expect("Failed to update service");
		assert_eq!(updated.name.as_ref(), "new-name");

		assert!(matches!(adapter.read_service_by_name("old-name").await, Err(Error::NotFound)));
	}

	#[tokio::test]
	async fn test_update_and_delete_missing_service() {
		let (adapter, _tmp) = create_test_adapter().await.expect("Failed to create adapter");

		assert!(matches!(
			adapter.update_service("ghost", &ServiceUpdate::default()).await,
			Err(Error::NotFound)
		));
		assert!(matches!(adapter.delete_service("ghost").await, Err(Error::NotFound)));
	}

	#[tokio::test]
	async fn test_delete() {
		let (adapter, _tmp) = create_test_adapter().await.expect("Failed to create adapter");

		adapter.create_service(&entry("doomed")).await.expect("Failed to create service");
		adapter.delete_service("doomed").await.expect("Failed to delete service");
		assert!(matches!(adapter.read_service_by_name("doomed").await, Err(Error::NotFound)));
	}
}

// vim: ts=4
