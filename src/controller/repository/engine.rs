//! # Repository Engine
//!
//! Pure functions comparing a `RepositoryParameters` spec with the repository
//! GitHub reports:
//! - `override_parameters` lays the spec over an observed repository
//! - `is_up_to_date` detects drift
//! - `late_initialize` fills unset spec fields from GitHub
//! - `generate_observation` flattens the repository into status
//! - `split_full_name` and `generate_template_repo_request` prepare
//!   creation from a template

use crate::crd::{Condition, Reference, RepositoryObservation, RepositoryParameters, REASON_CREATING};
use crate::error::{Error, Result};
use crate::provider::github::values::{
    bool_value, convert_timestamp, int64_value, non_empty, string_value,
};
use crate::provider::github::{Repository, TemplateRepoRequest, OWNER_TYPE_ORGANIZATION};
use std::collections::BTreeMap;

fn override_field<T: Clone>(target: &mut Option<T>, desired: Option<&T>) {
    if let Some(value) = desired {
        *target = Some(value.clone());
    }
}

fn late_init_field<T: Clone>(desired: &mut Option<T>, observed: Option<&T>) {
    if desired.is_none() {
        *desired = observed.cloned();
    }
}

/// Lays every set field of `rp` over `base`. A non-empty name always wins.
#[must_use]
pub fn override_parameters(rp: &RepositoryParameters, mut base: Repository) -> Repository {
    if !rp.name.is_empty() {
        base.name = Some(rp.name.clone());
    }
    override_field(&mut base.description, rp.description.as_ref());
    override_field(&mut base.homepage, rp.homepage.as_ref());
    override_field(&mut base.private, rp.private.as_ref());
    override_field(&mut base.visibility, rp.visibility.as_ref());
    override_field(&mut base.has_issues, rp.has_issues.as_ref());
    override_field(&mut base.has_projects, rp.has_projects.as_ref());
    override_field(&mut base.has_wiki, rp.has_wiki.as_ref());
    override_field(&mut base.auto_init, rp.auto_init.as_ref());
    override_field(&mut base.is_template, rp.is_template.as_ref());
    override_field(&mut base.team_id, rp.team_id.as_ref());
    override_field(&mut base.gitignore_template, rp.gitignore_template.as_ref());
    override_field(&mut base.license_template, rp.license_template.as_ref());
    override_field(&mut base.allow_squash_merge, rp.allow_squash_merge.as_ref());
    override_field(&mut base.allow_merge_commit, rp.allow_merge_commit.as_ref());
    override_field(&mut base.allow_rebase_merge, rp.allow_rebase_merge.as_ref());
    override_field(
        &mut base.delete_branch_on_merge,
        rp.delete_branch_on_merge.as_ref(),
    );
    override_field(&mut base.has_pages, rp.has_pages.as_ref());
    override_field(&mut base.has_downloads, rp.has_downloads.as_ref());
    override_field(&mut base.default_branch, rp.default_branch.as_ref());
    override_field(&mut base.archived, rp.archived.as_ref());
    base
}

/// Clears fields GitHub only honors at creation time.
fn without_create_only_fields(mut repo: Repository) -> Repository {
    repo.auto_init = None;
    repo
}

/// Whether GitHub already matches every field set in `rp`.
#[must_use]
pub fn is_up_to_date(rp: &RepositoryParameters, observed: &Repository) -> bool {
    let desired = override_parameters(rp, observed.clone());
    without_create_only_fields(desired) == without_create_only_fields(observed.clone())
}

/// Fills unset fields of `rp` from the observed repository. Set fields are
/// never overwritten.
///
/// `ready` is the resource's `Ready` condition; while it reports `Creating`
/// the default branch is taken from the template, see
/// [`adopt_template_default_branch`].
pub fn late_initialize(
    rp: &mut RepositoryParameters,
    observed: &mut Repository,
    ready: Option<&Condition>,
) {
    let owned_by_organization = observed
        .owner
        .as_ref()
        .and_then(|owner| owner.r#type.as_deref())
        == Some(OWNER_TYPE_ORGANIZATION);
    if owned_by_organization {
        late_init_field(
            &mut rp.organization,
            observed
                .organization
                .as_ref()
                .and_then(|org| org.login.as_ref()),
        );
    }
    late_init_field(&mut rp.description, observed.description.as_ref());
    late_init_field(&mut rp.homepage, observed.homepage.as_ref());
    late_init_field(&mut rp.private, observed.private.as_ref());
    late_init_field(&mut rp.visibility, observed.visibility.as_ref());
    late_init_field(&mut rp.has_issues, observed.has_issues.as_ref());
    late_init_field(&mut rp.has_projects, observed.has_projects.as_ref());
    late_init_field(&mut rp.has_wiki, observed.has_wiki.as_ref());
    late_init_field(&mut rp.is_template, observed.is_template.as_ref());
    late_init_field(&mut rp.team_id, observed.team_id.as_ref());
    late_init_field(&mut rp.auto_init, observed.auto_init.as_ref());
    late_init_field(&mut rp.gitignore_template, observed.gitignore_template.as_ref());
    late_init_field(&mut rp.license_template, observed.license_template.as_ref());
    late_init_field(&mut rp.allow_squash_merge, observed.allow_squash_merge.as_ref());
    late_init_field(&mut rp.allow_merge_commit, observed.allow_merge_commit.as_ref());
    late_init_field(&mut rp.allow_rebase_merge, observed.allow_rebase_merge.as_ref());
    late_init_field(
        &mut rp.delete_branch_on_merge,
        observed.delete_branch_on_merge.as_ref(),
    );
    late_init_field(&mut rp.has_pages, observed.has_pages.as_ref());
    late_init_field(&mut rp.has_downloads, observed.has_downloads.as_ref());
    late_init_field(&mut rp.archived, observed.archived.as_ref());

    if let Some(full_name) = observed
        .template_repository
        .as_ref()
        .and_then(|template| template.full_name.as_ref())
    {
        rp.template = Some(Reference {
            name: full_name.clone(),
        });
    }

    let creating = ready.is_some_and(|c| c.has_reason(REASON_CREATING));
    if creating && observed.template_repository.is_some() {
        if rp.default_branch.is_none() {
            adopt_template_default_branch(rp, observed);
        }
    } else {
        late_init_field(&mut rp.default_branch, observed.default_branch.as_ref());
    }
}

/// Takes the default branch from the template for both the spec and the
/// observed repository.
///
/// Right after generation from a template GitHub briefly reports `main` as
/// the default branch before switching to the template's branch.
pub fn adopt_template_default_branch(rp: &mut RepositoryParameters, observed: &mut Repository) {
    let branch = observed
        .template_repository
        .as_ref()
        .and_then(|template| template.default_branch.clone());
    rp.default_branch.clone_from(&branch);
    observed.default_branch = branch;
}

/// Flattens the observed repository into the status observation.
#[must_use]
pub fn generate_observation(r: &Repository) -> RepositoryObservation {
    let s = |v: &Option<String>| string_value(v.as_deref());
    RepositoryObservation {
        id: int64_value(r.id),
        node_id: s(&r.node_id),
        full_name: s(&r.full_name),
        name: s(&r.name),
        url: s(&r.url),
        archive_url: s(&r.archive_url),
        assignees_url: s(&r.assignees_url),
        blobs_url: s(&r.blobs_url),
        branches_url: s(&r.branches_url),
        collaborators_url: s(&r.collaborators_url),
        comments_url: s(&r.comments_url),
        commits_url: s(&r.commits_url),
        compare_url: s(&r.compare_url),
        contents_url: s(&r.contents_url),
        contributors_url: s(&r.contributors_url),
        deployments_url: s(&r.deployments_url),
        downloads_url: s(&r.downloads_url),
        events_url: s(&r.events_url),
        forks_url: s(&r.forks_url),
        git_commits_url: s(&r.git_commits_url),
        git_refs_url: s(&r.git_refs_url),
        git_tags_url: s(&r.git_tags_url),
        hooks_url: s(&r.hooks_url),
        issue_comment_url: s(&r.issue_comment_url),
        issue_events_url: s(&r.issue_events_url),
        issues_url: s(&r.issues_url),
        keys_url: s(&r.keys_url),
        labels_url: s(&r.labels_url),
        languages_url: s(&r.languages_url),
        merges_url: s(&r.merges_url),
        milestones_url: s(&r.milestones_url),
        notifications_url: s(&r.notifications_url),
        pulls_url: s(&r.pulls_url),
        releases_url: s(&r.releases_url),
        stargazers_url: s(&r.stargazers_url),
        statuses_url: s(&r.statuses_url),
        subscribers_url: s(&r.subscribers_url),
        subscription_url: s(&r.subscription_url),
        tags_url: s(&r.tags_url),
        trees_url: s(&r.trees_url),
        teams_url: s(&r.teams_url),
        html_url: s(&r.html_url),
        clone_url: s(&r.clone_url),
        git_url: s(&r.git_url),
        mirror_url: s(&r.mirror_url),
        ssh_url: s(&r.ssh_url),
        svn_url: s(&r.svn_url),
        forks_count: int64_value(r.forks_count),
        network_count: int64_value(r.network_count),
        open_issues_count: int64_value(r.open_issues_count),
        stargazers_count: int64_value(r.stargazers_count),
        subscribers_count: int64_value(r.subscribers_count),
        watchers_count: int64_value(r.watchers_count),
        created_at: convert_timestamp(r.created_at.as_ref()),
        pushed_at: convert_timestamp(r.pushed_at.as_ref()),
        updated_at: convert_timestamp(r.updated_at.as_ref()),
        language: s(&r.language),
        fork: bool_value(r.fork),
        size: int64_value(r.size),
        topics: r.topics.clone().unwrap_or_default(),
        disabled: bool_value(r.disabled),
        permissions: r
            .permissions
            .as_ref()
            .map(|p| p.iter().map(|(k, v)| (k.clone(), *v)).collect()),
    }
}

/// Splits a template reference of the form `{owner}/{name}` into a map with
/// the keys `owner` and `name`.
///
/// # Errors
///
/// Returns [`Error::MalformedReference`] unless the reference has exactly
/// two `/`-separated segments.
pub fn split_full_name(full_name: &str) -> Result<BTreeMap<String, String>> {
    let segments: Vec<&str> = full_name.split('/').collect();
    let [owner, name] = segments.as_slice() else {
        return Err(Error::MalformedReference);
    };
    Ok(BTreeMap::from([
        ("owner".to_string(), (*owner).to_string()),
        ("name".to_string(), (*name).to_string()),
    ]))
}

/// Builds the body for generating a repository from a template.
#[must_use]
pub fn generate_template_repo_request(rp: &RepositoryParameters) -> TemplateRepoRequest {
    TemplateRepoRequest {
        name: non_empty(&rp.name),
        owner: non_empty(&rp.owner),
        description: rp.description.clone(),
        private: rp.private,
    }
}
