use super::{ActionKind, PendingAction};

use quilt_core::{
    schema::Relation,
    validation::{ChildErrors, Errors},
};

/// Lifts the validation errors of staged children into `parent_errors`.
///
/// Every message of a failing create or update is copied under
/// `<relation>.<field>` for has-one relations and
/// `<relation>[<position>].<field>` for has-many relations. Destroyed and
/// skipped mappings never contribute. Existing parent errors are kept.
///
/// Returns the per-child errors that were lifted, in submission order.
pub fn aggregate(
    relation: &Relation,
    actions: &[PendingAction],
    parent_errors: &mut Errors,
) -> Vec<ChildErrors> {
    let mut lifted = vec![];

    for action in actions {
        if !matches!(action.kind(), ActionKind::Create | ActionKind::Update) {
            continue;
        }

        let Some(child) = action.child() else {
            continue;
        };

        if child.errors().is_empty() {
            continue;
        }

        let child_errors = ChildErrors {
            relation: relation.name.clone(),
            position: relation.is_has_many().then_some(action.position()),
            errors: child.errors().clone(),
        };

        parent_errors.extend_scoped(&child_errors.prefix(), &child_errors.errors);
        lifted.push(child_errors);
    }

    lifted
}
