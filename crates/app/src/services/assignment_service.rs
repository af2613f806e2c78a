//! Assignment service: keeps assignments and their labels consistent.
//!
//! Reads go through the repositories directly. Every multi-row write runs in
//! a single [`UnitOfWork`] that is committed only at the end of the
//! successful path and rolled back on the first failure.

use smartmon_domain::assignment::{Assignment, AssignmentUpdate, NewAssignment};
use smartmon_domain::error::{ConflictError, LookupKey, MonitorError, NotFoundError};
use smartmon_domain::id::AssignmentId;
use smartmon_domain::label::Label;
use smartmon_domain::page::Page;
use smartmon_domain::view::AssignmentView;

use crate::ports::{AssignmentRepository, LabelRepository, UnitOfWork, UnitOfWorkFactory};

const ASSIGNMENT: &str = "Assignment";
const LABEL: &str = "Label";

/// Application service for assignment CRUD operations.
pub struct AssignmentService<AR, LR, UF> {
    assignments: AR,
    labels: LR,
    work: UF,
}

impl<AR, LR, UF> AssignmentService<AR, LR, UF>
where
    AR: AssignmentRepository,
    LR: LabelRepository,
    UF: UnitOfWorkFactory,
{
    /// Create a new service backed by the given repositories.
    pub fn new(assignments: AR, labels: LR, work: UF) -> Self {
        Self {
            assignments,
            labels,
            work,
        }
    }

    /// List one page of assignments with their labels.
    ///
    /// The page and the full label set are fetched concurrently, then joined
    /// locally.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from either repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_assignments(&self, page: Page) -> Result<Vec<AssignmentView>, MonitorError> {
        let (labels, assignments) =
            tokio::try_join!(self.labels.get_all(), self.assignments.get_page(page))?;

        Ok(assignments
            .into_iter()
            .map(|assignment| AssignmentView::assemble(assignment, &labels))
            .collect())
    }

    /// Look up an assignment by name.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotFound`] when no assignment is called `name`,
    /// or a storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<AssignmentView, MonitorError> {
        let assignment = self.require_by_name(name).await?;
        let labels = self.labels.find_by_assignment_id(assignment.id).await?;
        Ok(AssignmentView::assemble(assignment, &labels))
    }

    /// Look up an assignment by id.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotFound`] when no assignment has `id`,
    /// or a storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: AssignmentId) -> Result<AssignmentView, MonitorError> {
        let assignment = self.require_by_id(id).await?;
        let labels = self.labels.find_by_assignment_id(id).await?;
        Ok(AssignmentView::assemble(assignment, &labels))
    }

    /// List the labels owned by an assignment.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotFound`] naming the label entity when the
    /// assignment does not exist, or a storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn labels_of(&self, assignment_id: AssignmentId) -> Result<Vec<Label>, MonitorError> {
        if self.assignments.get_by_id(assignment_id).await?.is_none() {
            return Err(NotFoundError {
                entity: LABEL,
                key: LookupKey::AssignmentId(assignment_id),
            }
            .into());
        }
        self.labels.find_by_assignment_id(assignment_id).await
    }

    /// Find every assignment carrying a label with exactly this text.
    ///
    /// One view is returned per distinct assignment, in the order the
    /// matching labels were first seen.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotFound`] when no label matches, or when a
    /// referenced assignment has vanished. No partial result is returned.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_label(&self, label: &str) -> Result<Vec<AssignmentView>, MonitorError> {
        let matching = self.labels.find_by_description(label).await?;
        if matching.is_empty() {
            return Err(NotFoundError {
                entity: LABEL,
                key: LookupKey::Description(label.to_string()),
            }
            .into());
        }

        let mut owners: Vec<AssignmentId> = Vec::new();
        for label in &matching {
            if !owners.contains(&label.assignment_id) {
                owners.push(label.assignment_id);
            }
        }

        let mut views = Vec::with_capacity(owners.len());
        for id in owners {
            views.push(self.get_by_id(id).await?);
        }
        Ok(views)
    }

    /// Create an assignment and its labels in one unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Validation`] if invariants fail,
    /// [`MonitorError::Conflict`] if the name is taken, or a storage error.
    /// Nothing is persisted when an error is returned after the unit of work
    /// has started.
    #[tracing::instrument(skip(self, new), fields(assignment_name = %new.name))]
    pub async fn create_assignment(
        &self,
        new: NewAssignment,
    ) -> Result<AssignmentView, MonitorError> {
        new.validate()?;

        if self.assignments.get_by_name(&new.name).await?.is_some() {
            return Err(ConflictError { name: new.name }.into());
        }

        let mut work = self.work.begin().await?;
        match insert_with_labels(&mut work, &new).await {
            Ok(id) => {
                work.commit().await?;
                tracing::info!(%id, labels = new.labels.len(), "assignment created");
            }
            Err(err) => {
                abandon(work).await;
                return Err(err);
            }
        }

        self.get_by_name(&new.name).await
    }

    /// Apply a partial update to the assignment called `name`.
    ///
    /// Only fields that differ from the stored values are written; a port
    /// outside `1..=65535` is skipped. A non-empty label list replaces every
    /// existing label. When nothing changes no unit of work is opened and the
    /// current state is returned.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotFound`] when no assignment is called `name`,
    /// or a storage error.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_assignment(
        &self,
        name: &str,
        update: AssignmentUpdate,
    ) -> Result<AssignmentView, MonitorError> {
        let current = self.require_by_name(name).await?;
        let merged = current.merged(&update);
        let replacement = update.replacement_labels();

        if merged.is_none() && replacement.is_none() {
            tracing::debug!("no effective change, skipping write");
            let labels = self.labels.find_by_assignment_id(current.id).await?;
            return Ok(AssignmentView::assemble(current, &labels));
        }

        let mut work = self.work.begin().await?;
        match apply_update(&mut work, current.id, merged.as_ref(), replacement).await {
            Ok(()) => work.commit().await?,
            Err(err) => {
                abandon(work).await;
                return Err(err);
            }
        }

        let assignment = merged.unwrap_or(current);
        let labels = self.labels.find_by_assignment_id(assignment.id).await?;
        Ok(AssignmentView::assemble(assignment, &labels))
    }

    /// Delete the assignment called `name` together with its labels.
    ///
    /// Returns the last-known state of what was removed.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotFound`] when no assignment is called `name`,
    /// or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_assignment(&self, name: &str) -> Result<AssignmentView, MonitorError> {
        let assignment = self.require_by_name(name).await?;
        let labels = self.labels.find_by_assignment_id(assignment.id).await?;

        let mut work = self.work.begin().await?;
        match remove(&mut work, assignment.id).await {
            Ok(()) => work.commit().await?,
            Err(err) => {
                abandon(work).await;
                return Err(err);
            }
        }

        Ok(AssignmentView::assemble(assignment, &labels))
    }

    async fn require_by_name(&self, name: &str) -> Result<Assignment, MonitorError> {
        self.assignments.get_by_name(name).await?.ok_or_else(|| {
            NotFoundError {
                entity: ASSIGNMENT,
                key: LookupKey::Name(name.to_string()),
            }
            .into()
        })
    }

    async fn require_by_id(&self, id: AssignmentId) -> Result<Assignment, MonitorError> {
        self.assignments.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: ASSIGNMENT,
                key: LookupKey::Id(id),
            }
            .into()
        })
    }
}

async fn insert_with_labels<W: UnitOfWork>(
    work: &mut W,
    new: &NewAssignment,
) -> Result<AssignmentId, MonitorError> {
    let id = work
        .insert_assignment(&new.name, new.port, new.maintainer.as_deref())
        .await?;
    for description in &new.labels {
        work.insert_label(id, description).await?;
    }
    Ok(id)
}

async fn apply_update<W: UnitOfWork>(
    work: &mut W,
    id: AssignmentId,
    merged: Option<&Assignment>,
    replacement: Option<&[String]>,
) -> Result<(), MonitorError> {
    if let Some(assignment) = merged {
        work.update_assignment(assignment).await?;
    }
    if let Some(descriptions) = replacement {
        work.delete_labels(id).await?;
        for description in descriptions {
            work.insert_label(id, description).await?;
        }
    }
    Ok(())
}

async fn remove<W: UnitOfWork>(work: &mut W, id: AssignmentId) -> Result<(), MonitorError> {
    work.delete_labels(id).await?;
    work.delete_assignment(id).await
}

async fn abandon<W: UnitOfWork>(work: W) {
    if let Err(err) = work.rollback().await {
        tracing::warn!(error = %err, "failed to roll back unit of work");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartmon_domain::error::ValidationError;
    use smartmon_domain::id::LabelId;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct State {
        assignments: Vec<Assignment>,
        labels: Vec<Label>,
        next_id: i64,
        writes: usize,
    }

    impl State {
        fn next_id(&mut self) -> i64 {
            self.next_id += 1;
            self.next_id
        }
    }

    /// Shared in-memory store implementing every storage port.
    #[derive(Clone, Default)]
    struct InMemoryStore {
        state: Arc<Mutex<State>>,
        failing_label: Option<String>,
    }

    impl InMemoryStore {
        fn failing_on(description: &str) -> Self {
            Self {
                failing_label: Some(description.to_string()),
                ..Self::default()
            }
        }

        fn writes(&self) -> usize {
            self.state.lock().unwrap().writes
        }

        fn label_rows(&self) -> Vec<Label> {
            self.state.lock().unwrap().labels.clone()
        }
    }

    impl AssignmentRepository for InMemoryStore {
        fn get_page(
            &self,
            page: Page,
        ) -> impl Future<Output = Result<Vec<Assignment>, MonitorError>> + Send {
            let state = self.state.lock().unwrap();
            let offset = usize::try_from(page.offset()).unwrap();
            let limit = usize::try_from(page.limit()).unwrap();
            let result: Vec<Assignment> = state
                .assignments
                .iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect();
            async { Ok(result) }
        }

        fn get_by_name(
            &self,
            name: &str,
        ) -> impl Future<Output = Result<Option<Assignment>, MonitorError>> + Send {
            let state = self.state.lock().unwrap();
            let result = state.assignments.iter().find(|a| a.name == name).cloned();
            async { Ok(result) }
        }

        fn get_by_id(
            &self,
            id: AssignmentId,
        ) -> impl Future<Output = Result<Option<Assignment>, MonitorError>> + Send {
            let state = self.state.lock().unwrap();
            let result = state.assignments.iter().find(|a| a.id == id).cloned();
            async { Ok(result) }
        }
    }

    impl LabelRepository for InMemoryStore {
        fn get_all(&self) -> impl Future<Output = Result<Vec<Label>, MonitorError>> + Send {
            let result = self.label_rows();
            async { Ok(result) }
        }

        fn find_by_description(
            &self,
            description: &str,
        ) -> impl Future<Output = Result<Vec<Label>, MonitorError>> + Send {
            let state = self.state.lock().unwrap();
            let result: Vec<Label> = state
                .labels
                .iter()
                .filter(|l| l.description == description)
                .cloned()
                .collect();
            async { Ok(result) }
        }

        fn find_by_assignment_id(
            &self,
            assignment_id: AssignmentId,
        ) -> impl Future<Output = Result<Vec<Label>, MonitorError>> + Send {
            let state = self.state.lock().unwrap();
            let result: Vec<Label> = state
                .labels
                .iter()
                .filter(|l| l.assignment_id == assignment_id)
                .cloned()
                .collect();
            async { Ok(result) }
        }
    }

    /// Works on a private copy of the state, published on commit.
    struct InMemoryWork {
        shared: Arc<Mutex<State>>,
        staged: State,
        failing_label: Option<String>,
    }

    impl UnitOfWorkFactory for InMemoryStore {
        type Work = InMemoryWork;

        fn begin(&self) -> impl Future<Output = Result<InMemoryWork, MonitorError>> + Send {
            let work = InMemoryWork {
                shared: Arc::clone(&self.state),
                staged: self.state.lock().unwrap().clone(),
                failing_label: self.failing_label.clone(),
            };
            async { Ok(work) }
        }
    }

    impl UnitOfWork for InMemoryWork {
        async fn insert_assignment(
            &mut self,
            name: &str,
            port: u16,
            maintainer: Option<&str>,
        ) -> Result<AssignmentId, MonitorError> {
            let id = AssignmentId::new(self.staged.next_id());
            self.staged.assignments.push(Assignment {
                id,
                name: name.to_string(),
                port,
                maintainer: maintainer.map(str::to_string),
            });
            self.staged.writes += 1;
            Ok(id)
        }

        async fn update_assignment(&mut self, assignment: &Assignment) -> Result<(), MonitorError> {
            for stored in &mut self.staged.assignments {
                if stored.id == assignment.id {
                    *stored = assignment.clone();
                }
            }
            self.staged.writes += 1;
            Ok(())
        }

        async fn delete_assignment(&mut self, id: AssignmentId) -> Result<(), MonitorError> {
            self.staged.assignments.retain(|a| a.id != id);
            self.staged.writes += 1;
            Ok(())
        }

        async fn insert_label(
            &mut self,
            assignment_id: AssignmentId,
            description: &str,
        ) -> Result<LabelId, MonitorError> {
            if self.failing_label.as_deref() == Some(description) {
                return Err(MonitorError::Storage(Box::new(std::io::Error::other(
                    "label insert failed",
                ))));
            }
            let id = LabelId::new(self.staged.next_id());
            self.staged.labels.push(Label {
                id,
                assignment_id,
                description: description.to_string(),
            });
            self.staged.writes += 1;
            Ok(id)
        }

        async fn delete_labels(&mut self, assignment_id: AssignmentId) -> Result<(), MonitorError> {
            self.staged.labels.retain(|l| l.assignment_id != assignment_id);
            self.staged.writes += 1;
            Ok(())
        }

        async fn commit(self) -> Result<(), MonitorError> {
            *self.shared.lock().unwrap() = self.staged;
            Ok(())
        }

        async fn rollback(self) -> Result<(), MonitorError> {
            Ok(())
        }
    }

    type Service = AssignmentService<InMemoryStore, InMemoryStore, InMemoryStore>;

    fn make_service_over(store: &InMemoryStore) -> Service {
        AssignmentService::new(store.clone(), store.clone(), store.clone())
    }

    fn make_service() -> (Service, InMemoryStore) {
        let store = InMemoryStore::default();
        (make_service_over(&store), store)
    }

    fn test_assignment() -> NewAssignment {
        NewAssignment::builder()
            .name("test")
            .port(1111)
            .maintainer("test@test.com")
            .label("test:test")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_return_created_fields_when_fetched_by_name() {
        let (svc, _) = make_service();
        let created = svc.create_assignment(test_assignment()).await.unwrap();

        let fetched = svc.get_by_name("test").await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.port, 1111);
        assert_eq!(fetched.maintainer.as_deref(), Some("test@test.com"));
        assert_eq!(fetched.labels, vec!["test:test".to_string()]);
    }

    #[tokio::test]
    async fn should_reject_duplicate_name_regardless_of_other_fields() {
        let (svc, _) = make_service();
        svc.create_assignment(test_assignment()).await.unwrap();

        let other = NewAssignment::builder()
            .name("test")
            .port(9)
            .build()
            .unwrap();
        let result = svc.create_assignment(other).await;
        assert!(matches!(result, Err(MonitorError::Conflict(_))));
    }

    #[tokio::test]
    async fn should_reject_invalid_input_before_touching_store() {
        let (svc, store) = make_service();
        let mut invalid = test_assignment();
        invalid.name = "abc".to_string();

        let result = svc.create_assignment(invalid).await;
        assert!(matches!(
            result,
            Err(MonitorError::Validation(ValidationError::NameLength { .. }))
        ));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn should_roll_back_assignment_when_label_insert_fails() {
        let store = InMemoryStore::failing_on("boom");
        let svc = make_service_over(&store);
        let new = NewAssignment::builder()
            .name("test")
            .port(1111)
            .labels(["ok:1", "boom"])
            .build()
            .unwrap();

        let result = svc.create_assignment(new).await;
        assert!(matches!(result, Err(MonitorError::Storage(_))));
        assert!(matches!(
            svc.get_by_name("test").await,
            Err(MonitorError::NotFound(_))
        ));
        assert!(store.label_rows().is_empty());
    }

    #[tokio::test]
    async fn should_name_entity_and_key_when_missing() {
        let (svc, _) = make_service();

        let by_name = svc.get_by_name("test_none").await.unwrap_err();
        assert_eq!(
            by_name.to_string(),
            "Assignment is not found by name:test_none"
        );

        let by_id = svc.get_by_id(AssignmentId::new(99)).await.unwrap_err();
        assert_eq!(by_id.to_string(), "Assignment is not found by id:99");

        let labels = svc.labels_of(AssignmentId::new(99)).await.unwrap_err();
        assert_eq!(
            labels.to_string(),
            "Label is not found by assignment id:99"
        );
    }

    #[tokio::test]
    async fn should_list_assignments_with_their_labels() {
        let (svc, _) = make_service();
        svc.create_assignment(test_assignment()).await.unwrap();

        let all = svc.list_assignments(Page::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].port, 1111);
        assert_eq!(all[0].maintainer.as_deref(), Some("test@test.com"));
        assert_eq!(all[0].labels, vec!["test:test".to_string()]);
    }

    #[tokio::test]
    async fn should_paginate_by_offset() {
        let (svc, _) = make_service();
        for name in ["alpha", "bravo", "charlie"] {
            let new = NewAssignment::builder().name(name).port(80).build().unwrap();
            svc.create_assignment(new).await.unwrap();
        }

        let second = svc.list_assignments(Page::new(2, 2).unwrap()).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "charlie");
    }

    #[tokio::test]
    async fn should_find_assignments_by_label() {
        let (svc, _) = make_service();
        svc.create_assignment(test_assignment()).await.unwrap();
        let other = NewAssignment::builder()
            .name("other")
            .port(2)
            .labels(["test:test", "zone:b"])
            .build()
            .unwrap();
        svc.create_assignment(other).await.unwrap();

        let found = svc.get_by_label("test:test").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "test");
        assert_eq!(found[1].labels, vec!["test:test".to_string(), "zone:b".to_string()]);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_label() {
        let (svc, _) = make_service();
        svc.create_assignment(test_assignment()).await.unwrap();

        let err = svc.get_by_label("nonexistent").await.unwrap_err();
        assert!(matches!(err, MonitorError::NotFound(_)));
        assert!(err.to_string().contains("nonexistent"));
    }

    #[tokio::test]
    async fn should_not_write_when_update_changes_nothing() {
        let (svc, store) = make_service();
        let created = svc.create_assignment(test_assignment()).await.unwrap();
        let before = store.writes();

        let update = AssignmentUpdate::builder()
            .port(1111)
            .maintainer("test@test.com")
            .build();
        let view = svc.update_assignment("test", update).await.unwrap();

        assert_eq!(view, created);
        assert_eq!(store.writes(), before);
    }

    #[tokio::test]
    async fn should_update_only_changed_fields() {
        let (svc, _) = make_service();
        svc.create_assignment(test_assignment()).await.unwrap();

        let update = AssignmentUpdate::builder()
            .port(2222)
            .maintainer("test@test")
            .build();
        let view = svc.update_assignment("test", update).await.unwrap();

        assert_eq!(view.port, 2222);
        assert_eq!(view.maintainer.as_deref(), Some("test@test"));
        assert_eq!(view.labels, vec!["test:test".to_string()]);
        assert_eq!(svc.get_by_name("test").await.unwrap(), view);
    }

    #[tokio::test]
    async fn should_replace_whole_label_set_on_update() {
        let (svc, _) = make_service();
        svc.create_assignment(test_assignment()).await.unwrap();

        let update = AssignmentUpdate::builder()
            .labels(["env:prod", "team:ops"])
            .build();
        let view = svc.update_assignment("test", update).await.unwrap();

        let expected = vec!["env:prod".to_string(), "team:ops".to_string()];
        assert_eq!(view.labels, expected);
        assert_eq!(svc.get_by_name("test").await.unwrap().labels, expected);
        assert!(matches!(
            svc.get_by_label("test:test").await,
            Err(MonitorError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_keep_labels_when_update_list_is_empty() {
        let (svc, store) = make_service();
        svc.create_assignment(test_assignment()).await.unwrap();
        let before = store.writes();

        let update = AssignmentUpdate::builder()
            .labels(Vec::<String>::new())
            .build();
        let view = svc.update_assignment("test", update).await.unwrap();

        assert_eq!(view.labels, vec!["test:test".to_string()]);
        assert_eq!(store.writes(), before);
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_assignment() {
        let (svc, _) = make_service();
        let result = svc
            .update_assignment("ghost", AssignmentUpdate::default())
            .await;
        assert!(matches!(result, Err(MonitorError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_delete_once_then_report_not_found() {
        let (svc, store) = make_service();
        let created = svc.create_assignment(test_assignment()).await.unwrap();

        let removed = svc.delete_assignment("test").await.unwrap();
        assert_eq!(removed, created);
        assert!(store.label_rows().is_empty());

        let again = svc.delete_assignment("test").await;
        assert!(matches!(again, Err(MonitorError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_skip_unusable_update_values_without_failing() {
        let (svc, store) = make_service();
        let created = svc.create_assignment(test_assignment()).await.unwrap();
        let before = store.writes();

        for port in [-1, 0, 70_000] {
            let update = AssignmentUpdate::builder().port(port).build();
            let view = svc.update_assignment("test", update).await.unwrap();
            assert_eq!(view, created);
        }
        assert_eq!(store.writes(), before);

        let update = AssignmentUpdate::builder().maintainer("x").build();
        let view = svc.update_assignment("test", update).await.unwrap();
        assert_eq!(view.maintainer.as_deref(), Some("x"));
        assert_eq!(view.port, created.port);
    }
}
