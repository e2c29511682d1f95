// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::collections::BTreeSet;

use signalements_audit::Cause;
use signalements_domain::{
    ASSIGNED_ONWARD, Collectivity, CollectivityTerritory, Commune, Ddfip, Dgfip, FormType, Office,
    Organization, Origin, Priority, Publisher, Report, ReportState, TRANSMITTED_ONWARD, User,
};
use time::OffsetDateTime;
use time::macros::datetime;
use signalements_persistence::{Persistence, Seed};

use crate::{
    AuthenticatedActor, CreateReportRequest, TransitionRequest, TransmitReportsResponse,
    create_report, transition, transmit_reports,
};

pub const PUBLISHER: i64 = 1;
pub const COLLECTIVITY: i64 = 2;
pub const OTHER_COLLECTIVITY: i64 = 3;
pub const DDFIP_64: i64 = 10;
pub const DDFIP_40: i64 = 11;

pub const OFFICE_HABITATION: i64 = 1;
pub const OFFICE_PAU: i64 = 2;
pub const OFFICE_LANDES: i64 = 3;

pub const COLLECTIVITY_USER: i64 = 100;
pub const OTHER_COLLECTIVITY_USER: i64 = 101;
pub const PUBLISHER_USER: i64 = 105;
pub const DDFIP_ADMIN: i64 = 110;
pub const FORM_ADMIN: i64 = 111;
pub const OFFICE_MEMBER: i64 = 112;
pub const DDFIP_USER: i64 = 113;
pub const LANDES_ADMIN: i64 = 120;
pub const DGFIP_USER: i64 = 130;
pub const SUPER_ADMIN: i64 = 140;

/// Every seeded user, for property tests over all actor types.
pub const ALL_USERS: [i64; 10] = [
    COLLECTIVITY_USER,
    OTHER_COLLECTIVITY_USER,
    PUBLISHER_USER,
    DDFIP_ADMIN,
    FORM_ADMIN,
    OFFICE_MEMBER,
    DDFIP_USER,
    LANDES_ADMIN,
    DGFIP_USER,
    SUPER_ADMIN,
];

fn commune(code_insee: &str, name: &str, code_departement: &str, epci: Option<&str>) -> Commune {
    Commune {
        code_insee: code_insee.to_string(),
        name: name.to_string(),
        code_departement: code_departement.to_string(),
        siren_epci: epci.map(str::to_string),
    }
}

fn user(user_id: i64, organization_id: i64) -> User {
    User {
        user_id,
        organization_id,
        name: format!("User {user_id}"),
        email: format!("user{user_id}@example.org"),
        organization_admin: false,
        super_admin: false,
        form_admin_types: BTreeSet::new(),
        office_ids: BTreeSet::new(),
    }
}

fn office(office_id: i64, ddfip_id: i64, name: &str, competences: &[FormType]) -> Office {
    Office {
        office_id,
        ddfip_id,
        name: name.to_string(),
        competences: competences.iter().copied().collect(),
        communes: BTreeSet::new(),
        epcis: BTreeSet::new(),
        departements: BTreeSet::new(),
        member_ids: BTreeSet::new(),
    }
}

pub fn create_test_seed() -> Seed {
    let mut ddfip_admin: User = user(DDFIP_ADMIN, DDFIP_64);
    ddfip_admin.organization_admin = true;
    let mut form_admin: User = user(FORM_ADMIN, DDFIP_64);
    form_admin.form_admin_types.insert(FormType::ValuationHabitation);
    let mut landes_admin: User = user(LANDES_ADMIN, DDFIP_40);
    landes_admin.organization_admin = true;
    let mut super_admin: User = user(SUPER_ADMIN, 20);
    super_admin.super_admin = true;

    let mut habitation: Office = office(
        OFFICE_HABITATION,
        DDFIP_64,
        "SIP Bayonne",
        &[FormType::ValuationHabitation, FormType::OccupancyHabitation],
    );
    habitation.departements.insert(String::from("64"));
    habitation.member_ids.insert(OFFICE_MEMBER);

    let mut pau: Office = office(
        OFFICE_PAU,
        DDFIP_64,
        "SIE Pau",
        &[FormType::ValuationProfessional, FormType::CreationProfessional],
    );
    pau.communes.insert(String::from("64445"));

    let mut landes: Office = office(OFFICE_LANDES, DDFIP_40, "SIP Mont-de-Marsan", &FormType::ALL);
    landes.departements.insert(String::from("40"));

    Seed {
        communes: vec![
            commune("64102", "Bayonne", "64", Some("200067106")),
            commune("64445", "Pau", "64", Some("200067254")),
            commune("40192", "Mont-de-Marsan", "40", None),
        ],
        organizations: vec![
            Organization::Publisher(Publisher {
                publisher_id: PUBLISHER,
                name: String::from("Fiscalite Logiciels"),
            }),
            Organization::Collectivity(Collectivity {
                collectivity_id: COLLECTIVITY,
                name: String::from("Bayonne"),
                publisher_id: Some(PUBLISHER),
                territory: CollectivityTerritory::Commune(String::from("64102")),
            }),
            Organization::Collectivity(Collectivity {
                collectivity_id: OTHER_COLLECTIVITY,
                name: String::from("CA Pays Basque"),
                publisher_id: None,
                territory: CollectivityTerritory::Epci(String::from("200067106")),
            }),
            Organization::Ddfip(Ddfip {
                ddfip_id: DDFIP_64,
                name: String::from("DDFIP des Pyrenees-Atlantiques"),
                code_departement: String::from("64"),
            }),
            Organization::Ddfip(Ddfip {
                ddfip_id: DDFIP_40,
                name: String::from("DDFIP des Landes"),
                code_departement: String::from("40"),
            }),
            Organization::Dgfip(Dgfip {
                dgfip_id: 20,
                name: String::from("DGFIP"),
            }),
        ],
        users: vec![
            user(COLLECTIVITY_USER, COLLECTIVITY),
            user(OTHER_COLLECTIVITY_USER, OTHER_COLLECTIVITY),
            user(PUBLISHER_USER, PUBLISHER),
            ddfip_admin,
            form_admin,
            user(OFFICE_MEMBER, DDFIP_64),
            user(DDFIP_USER, DDFIP_64),
            landes_admin,
            user(DGFIP_USER, 20),
            super_admin,
        ],
        offices: vec![habitation, pau, landes],
    }
}

/// Builds an actor from the seed without a database.
pub fn create_test_actor(user_id: i64) -> AuthenticatedActor {
    let seed: Seed = create_test_seed();
    let mut user: User = seed
        .users
        .iter()
        .find(|u| u.user_id == user_id)
        .cloned()
        .unwrap();
    user.office_ids = seed
        .offices
        .iter()
        .filter(|o| o.has_member(user_id))
        .map(|o| o.office_id)
        .collect();
    let organization: Organization = seed
        .organizations
        .iter()
        .find(|o| o.id() == user.organization_id)
        .cloned()
        .unwrap();
    AuthenticatedActor::new(user, organization)
}

/// Builds a collectivity web report on Bayonne in `state`.
///
/// The DDFIP is set once transmitted; the habitation office once assigned.
pub fn create_test_report(report_id: i64, state: ReportState) -> Report {
    let at: OffsetDateTime = datetime!(2026-03-10 09:00 UTC);
    let transmitted: bool = TRANSMITTED_ONWARD.contains(&state);
    Report {
        report_id,
        reference: format!("2026-03-{report_id:04}"),
        origin: Origin::WebUi,
        collectivity_id: COLLECTIVITY,
        publisher_id: None,
        sandbox: false,
        commune: String::from("64102"),
        form_type: FormType::ValuationHabitation,
        priority: Priority::default(),
        note: None,
        state,
        ddfip_id: transmitted.then_some(DDFIP_64),
        office_id: ASSIGNED_ONWARD
            .contains(&state)
            .then_some(OFFICE_HABITATION),
        package_reference: transmitted.then(|| String::from("2026-03-0001")),
        resolution_motif: None,
        reponse: None,
        rejection_reason: None,
        created_at: at,
        ready_at: None,
        transmitted_at: transmitted.then_some(at),
        accepted_at: None,
        assigned_at: None,
        resolved_at: None,
        approved_at: None,
        canceled_at: None,
        rejected_at: None,
        discarded_at: None,
        lock_version: 0,
    }
}

/// Builds an API report sent by the publisher for the collectivity.
pub fn create_test_api_report(report_id: i64, state: ReportState, sandbox: bool) -> Report {
    Report {
        origin: Origin::Api,
        publisher_id: Some(PUBLISHER),
        sandbox,
        ..create_test_report(report_id, state)
    }
}

/// A varied set of in-memory reports covering every state, origin, sandbox
/// flag, collectivity, DDFIP, office and form type, some of them discarded.
pub fn create_test_report_grid() -> Vec<Report> {
    let communes: [(&str, i64); 3] = [("64102", DDFIP_64), ("64445", DDFIP_64), ("40192", DDFIP_40)];

    (0..420_i64)
        .map(|i| {
            let index: usize = usize::try_from(i).unwrap();
            let state: ReportState = ReportState::ALL[index % 10];
            let (commune, ddfip_id) = communes[(index / 5) % 3];
            let office_id: i64 = if ddfip_id == DDFIP_40 {
                OFFICE_LANDES
            } else if (index / 11) % 2 == 0 {
                OFFICE_HABITATION
            } else {
                OFFICE_PAU
            };
            let mut report: Report = if (index / 3) % 2 == 0 {
                create_test_report(i + 1, state)
            } else {
                create_test_api_report(i + 1, state, false)
            };
            report.sandbox = index % 3 == 0 && report.origin == Origin::Api;
            report.collectivity_id = if (index / 7) % 3 == 0 {
                OTHER_COLLECTIVITY
            } else {
                COLLECTIVITY
            };
            report.commune = commune.to_string();
            report.form_type = FormType::ALL[(index / 2) % 6];
            report.ddfip_id = report.ddfip_id.map(|_| ddfip_id);
            report.office_id = report.office_id.map(|_| office_id);
            if index % 13 == 0 {
                report.discarded_at = Some(report.created_at);
            }
            report
        })
        .collect()
}

pub fn create_test_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence.load_seed(&create_test_seed()).unwrap();
    persistence
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-1"), String::from("API request"))
}

pub fn create_test_request(commune: &str, form_type: FormType) -> CreateReportRequest {
    CreateReportRequest {
        commune: commune.to_string(),
        form_type: form_type.as_str().to_string(),
        priority: None,
        note: None,
        collectivity_id: None,
        sandbox: false,
    }
}

/// A request a publisher sends for the collectivity it manages.
pub fn create_publisher_request(
    commune: &str,
    form_type: FormType,
    sandbox: bool,
) -> CreateReportRequest {
    CreateReportRequest {
        collectivity_id: Some(COLLECTIVITY),
        sandbox,
        ..create_test_request(commune, form_type)
    }
}

pub fn step(
    persistence: &mut Persistence,
    user_id: i64,
    report: &Report,
    request: TransitionRequest,
) -> Report {
    transition(
        persistence,
        &create_test_actor(user_id),
        report,
        &request,
        create_test_cause(),
    )
    .unwrap()
}

pub fn create_draft(
    persistence: &mut Persistence,
    user_id: i64,
    request: &CreateReportRequest,
) -> Report {
    create_report(
        persistence,
        &create_test_actor(user_id),
        request,
        create_test_cause(),
    )
    .unwrap()
}

/// Creates, readies and transmits a report as `user_id`.
pub fn create_transmitted(
    persistence: &mut Persistence,
    user_id: i64,
    request: &CreateReportRequest,
) -> Report {
    let draft: Report = create_draft(persistence, user_id, request);
    step(persistence, user_id, &draft, TransitionRequest::MarkReady);
    let response: TransmitReportsResponse = transmit_reports(
        persistence,
        &create_test_actor(user_id),
        &[draft.report_id],
        &create_test_cause(),
    )
    .unwrap();
    response.reports.into_iter().next().unwrap()
}

/// Takes a collectivity report on Bayonne to `assigned` in the habitation office.
pub fn create_assigned(persistence: &mut Persistence, form_type: FormType) -> Report {
    let transmitted: Report = create_transmitted(
        persistence,
        COLLECTIVITY_USER,
        &create_test_request("64102", form_type),
    );
    let accepted: Report = step(persistence, DDFIP_ADMIN, &transmitted, TransitionRequest::Accept);
    step(
        persistence,
        DDFIP_ADMIN,
        &accepted,
        TransitionRequest::Assign {
            office_id: OFFICE_HABITATION,
        },
    )
}
