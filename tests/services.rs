use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use proposal_admin::api::{ApiClient, CatalogFilters, CatalogSection, PdfAnalysisService};
use proposal_admin::identity::StaticIdentity;
use proposal_admin::models::analysis::{CurricularUnit, PdfAnalysis};
use proposal_admin::models::proposal::ObjectiveForm;
use proposal_admin::models::{
    ApiPea, ApiProposal, ApiSubject, ApiUser, Assignment, AssignmentPayload, KeyConcept, ObjectiveType, PeaDraft,
    PeaPayload, ProposalForm, Role, StudentCandidate, Subject, SubjectPayload, User, UserListMode,
};
use proposal_admin::notify::{drain, NotificationBus, NotificationKind};
use proposal_admin::services::{
    AssignmentBoard, AssignmentService, PeaService, ProposalService, SubjectService, SyncState,
    PDF_SERVICE_UNAVAILABLE, STUDENTS_PARTIALLY_ASSIGNED,
};
use proposal_admin::workflow::ReviewView;
use proposal_admin::{AppContext, AppError, AppResult};

#[derive(Default)]
struct RecordingApi {
    proposals: Mutex<Vec<ApiProposal>>,
    peas: Mutex<Vec<PeaPayload>>,
    existing_pea: bool,
    reject_assign: bool,
    reject_user: Option<i64>,
    assigned: Mutex<Vec<AssignmentPayload>>,
    catalog: Vec<Value>,
}

#[async_trait]
impl ApiClient for RecordingApi {
    async fn create_proposal(&self, payload: &ApiProposal) -> AppResult<ApiProposal> {
        self.proposals.lock().unwrap().push(payload.clone());
        let mut created = payload.clone();
        created.p_id = Some(77);
        Ok(created)
    }

    async fn create_subject(&self, _payload: &SubjectPayload) -> AppResult<ApiSubject> {
        Ok(ApiSubject::default())
    }

    async fn assign_subject_to_user(&self, payload: &AssignmentPayload) -> AppResult<()> {
        if self.reject_assign || self.reject_user == Some(payload.u_id) {
            return Err(AppError::api(Some(400), "El estudiante ya está inscrito"));
        }
        self.assigned.lock().unwrap().push(payload.clone());
        Ok(())
    }

    async fn remove_assignment(&self, _payload: &AssignmentPayload) -> AppResult<()> {
        Ok(())
    }

    async fn list_catalog(&self, _section: CatalogSection, _filters: &CatalogFilters) -> AppResult<Vec<Value>> {
        Ok(self.catalog.clone())
    }

    async fn create_pea(&self, payload: &PeaPayload) -> AppResult<ApiPea> {
        self.peas.lock().unwrap().push(payload.clone());
        Ok(ApiPea {
            pea_id: Some(5),
            s_id: Some(payload.s_id),
            pea_description: Some(payload.pea_description.clone()),
            ..Default::default()
        })
    }

    async fn list_pea(&self, subject_id: i64) -> AppResult<Vec<ApiPea>> {
        if !self.existing_pea {
            return Ok(Vec::new());
        }
        Ok(vec![ApiPea {
            pea_id: Some(1),
            s_id: Some(subject_id),
            pea_date_created: Some("2024-03-01T10:00:00Z".into()),
            ..Default::default()
        }])
    }

    async fn list_users(&self, _admin_id: i64, _mode: UserListMode) -> AppResult<Vec<ApiUser>> {
        Ok(Vec::new())
    }
}

struct FakeAnalyzer {
    healthy: bool,
}

#[async_trait]
impl PdfAnalysisService for FakeAnalyzer {
    async fn is_healthy(&self) -> bool {
        self.healthy
    }

    async fn analyze(&self, _file_name: &str, _document: Vec<u8>) -> AppResult<PdfAnalysis> {
        let mut analysis = PdfAnalysis::default();
        analysis.contenido_academico.descripcion = Some("Fundamentos de redes".into());
        analysis.unidades_curriculares = vec![
            CurricularUnit {
                numero: Some(1),
                nombre: Some("Modelo OSI".into()),
                conceptos: vec!["Capas".into(), "Capas".into(), " ".into()],
            },
            CurricularUnit {
                numero: Some(7),
                nombre: None,
                conceptos: vec!["Fuera de rango".into()],
            },
        ];
        Ok(analysis)
    }
}

fn context(api: Arc<RecordingApi>, user: User) -> AppContext {
    AppContext {
        api,
        notifier: Arc::new(NotificationBus::default()),
        identity: Arc::new(StaticIdentity::new(user)),
    }
}

fn proposal_form() -> ProposalForm {
    ProposalForm {
        name: "Gestor de laboratorios".into(),
        description: "Reserva de equipos".into(),
        difficulty_level: "Medio".into(),
        project_type: "2".into(),
        subject: "4".into(),
        objectives: vec![ObjectiveForm::new(ObjectiveType::General, "Construir", "Un sistema de reservas")],
        ..Default::default()
    }
}

fn subject(semester: u8) -> Subject {
    Subject {
        id: 4,
        name: "Redes".into(),
        semester: Some(semester),
        journey: None,
        active: true,
        tutor: None,
        students: Vec::new(),
    }
}

#[tokio::test]
async fn tutor_proposal_is_created_approved_with_author() -> Result<()> {
    let api = Arc::new(RecordingApi::default());
    let service = ProposalService::new(context(api.clone(), User::new(3, Some(Role::Tutor)).with_subjects([4])));

    let created = service.create(&proposal_form()).await?;
    assert_eq!(created.id, 77);

    let sent = api.proposals.lock().unwrap()[0].clone();
    assert_eq!(sent.p_author_id, Some(3));
    assert_eq!(sent.p_author_role, Some(2));
    assert_eq!(sent.p_approval_status.as_deref(), Some("Aprobada"));
    assert_eq!(sent.p_subject_id, Some(4));
    assert!(!service.is_processing());
    Ok(())
}

#[tokio::test]
async fn students_cannot_create_proposals() -> Result<()> {
    let api = Arc::new(RecordingApi::default());
    let service = ProposalService::new(context(api.clone(), User::new(9, Some(Role::Student))));

    let err = service.create(&proposal_form()).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(api.proposals.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn invalid_proposal_is_not_sent() -> Result<()> {
    let api = Arc::new(RecordingApi::default());
    let service = ProposalService::new(context(api.clone(), User::new(1, Some(Role::Admin))));

    let mut form = proposal_form();
    form.is_group = true;
    form.integrants = "1".into();

    let AppError::Validation(errors) = service.create(&form).await.unwrap_err() else {
        panic!("expected validation error");
    };
    assert_eq!(errors, vec!["Las propuestas grupales deben indicar un número de integrantes mayor a 1"]);
    assert!(api.proposals.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn listing_keeps_only_visible_proposals() -> Result<()> {
    let api = Arc::new(RecordingApi {
        catalog: vec![
            json!({"p_id": 1, "p_approval_status": "Aprobada", "p_subject_id": 4, "p_author_id": 2}),
            json!({"p_id": 2, "p_approval_status": "Pendiente", "p_subject_id": 4, "p_author_id": 2}),
            json!({"p_id": 3, "p_approval_status": "Aprobada", "p_subject_id": 5, "p_author_id": 2}),
            json!({"p_id": "no-numérico"}),
        ],
        ..Default::default()
    });
    let service = ProposalService::new(context(api, User::new(8, Some(Role::Student)).with_subjects([4])));

    let visible = service.list_visible(&CatalogFilters::new()).await?;
    assert_eq!(visible.len(), 1);
    let (proposal, permissions) = &visible[0];
    assert_eq!(proposal.id, 1);
    assert!(permissions.can_apply);

    let mut review = service.review(proposal);
    assert!(!review.open(ReviewView::Edit));
    assert!(review.open(ReviewView::Actions));
    Ok(())
}

#[tokio::test]
async fn students_only_see_active_subjects() -> Result<()> {
    let api = Arc::new(RecordingApi {
        catalog: vec![
            json!({"s_id": 4, "s_name": "Redes", "s_state": true}),
            json!({"s_id": 5, "s_name": "Compiladores", "s_state": false}),
            json!({"s_id": 6, "s_name": "Sin estado"}),
            json!({"s_id": "cuatro"}),
        ],
        ..Default::default()
    });

    let student = SubjectService::new(context(api.clone(), User::new(8, Some(Role::Student))));
    let visible = student.list_visible(&CatalogFilters::new()).await?;
    assert_eq!(visible.iter().map(|s| s.id).collect::<Vec<_>>(), vec![4]);

    let admin = SubjectService::new(context(api, User::new(1, Some(Role::Admin))));
    let all = admin.list_visible(&CatalogFilters::new()).await?;
    assert_eq!(all.iter().map(|s| s.id).collect::<Vec<_>>(), vec![4, 5, 6]);
    Ok(())
}

#[tokio::test]
async fn pdf_upload_is_refused_while_service_is_down() -> Result<()> {
    let api = Arc::new(RecordingApi::default());
    let service = PeaService::new(
        context(api, User::new(1, Some(Role::Admin))),
        Arc::new(FakeAnalyzer { healthy: false }),
    );

    let err = service.analyze_document(4, "pea.pdf", vec![1, 2, 3]).await.unwrap_err();
    assert_eq!(err.user_message(), PDF_SERVICE_UNAVAILABLE);
    assert_eq!(err.status(), Some(503));
    Ok(())
}

#[tokio::test]
async fn analysed_document_becomes_a_clean_draft() -> Result<()> {
    let api = Arc::new(RecordingApi::default());
    let service = PeaService::new(
        context(api, User::new(2, Some(Role::Tutor)).with_subjects([4])),
        Arc::new(FakeAnalyzer { healthy: true }),
    );

    let draft = service.analyze_document(4, "pea.pdf", Vec::new()).await?;
    assert_eq!(draft.subject_id, 4);
    assert_eq!(draft.description, "Fundamentos de redes");
    assert_eq!(draft.key_concepts, vec![KeyConcept::new(1, "Capas")]);

    let outsider = PeaService::new(
        context(Arc::new(RecordingApi::default()), User::new(2, Some(Role::Tutor)).with_subjects([9])),
        Arc::new(FakeAnalyzer { healthy: true }),
    );
    assert!(matches!(
        outsider.analyze_document(4, "pea.pdf", Vec::new()).await,
        Err(AppError::Forbidden(_))
    ));
    Ok(())
}

#[tokio::test]
async fn pea_requires_every_unit_and_a_single_record() -> Result<()> {
    let mut draft = PeaDraft {
        subject_id: 4,
        description: "Redes".into(),
        objective: "Comprender".into(),
        key_concepts: vec![KeyConcept::new(1, "Capas"), KeyConcept::new(2, "Enrutamiento")],
    };

    let api = Arc::new(RecordingApi::default());
    let service = PeaService::new(
        context(api.clone(), User::new(1, Some(Role::Admin))),
        Arc::new(FakeAnalyzer { healthy: true }),
    );
    let AppError::Validation(errors) = service.create(&draft).await.unwrap_err() else {
        panic!("expected validation error");
    };
    assert_eq!(errors, vec!["Debe agregar al menos un concepto para la unidad 3"]);

    draft.key_concepts.push(KeyConcept::new(3, "Seguridad"));
    let pea = service.create(&draft).await?;
    assert_eq!(pea.id, 5);
    assert_eq!(api.peas.lock().unwrap().len(), 1);

    let taken = PeaService::new(
        context(
            Arc::new(RecordingApi {
                existing_pea: true,
                ..Default::default()
            }),
            User::new(1, Some(Role::Admin)),
        ),
        Arc::new(FakeAnalyzer { healthy: true }),
    );
    assert!(matches!(taken.create(&draft).await, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn students_see_pea_without_registration_date() -> Result<()> {
    let api = Arc::new(RecordingApi {
        existing_pea: true,
        ..Default::default()
    });

    let student = PeaService::new(
        context(api.clone(), User::new(8, Some(Role::Student))),
        Arc::new(FakeAnalyzer { healthy: true }),
    );
    let records = student.list_for_subject(4).await?;
    assert_eq!(records.len(), 1);
    assert!(records[0].date_created.is_none());

    let admin = PeaService::new(
        context(api, User::new(1, Some(Role::Admin))),
        Arc::new(FakeAnalyzer { healthy: true }),
    );
    assert!(admin.list_for_subject(4).await?[0].date_created.is_some());
    Ok(())
}

#[tokio::test]
async fn rejected_student_assignment_is_reverted_on_the_board() -> Result<()> {
    let api = Arc::new(RecordingApi {
        reject_assign: true,
        ..Default::default()
    });
    let service = AssignmentService::new(context(api, User::new(1, Some(Role::Admin))));
    let board = Arc::new(Mutex::new(AssignmentBoard::new(4, vec![Assignment::tutor(2, 4, "Ana")])));

    let candidate = StudentCandidate {
        u_id: 9,
        u_name: "Luis".into(),
        u_semester: Some(2),
        state: "Cursando".into(),
        active_cursando: 0,
    };
    let err = service.assign_students(&board, &subject(2), &[candidate]).await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    let board = board.lock().unwrap();
    assert_eq!(board.items().len(), 1);
    assert_eq!(board.sync_state(), &SyncState::Synced);
    Ok(())
}

fn approved(u_id: i64, name: &str) -> StudentCandidate {
    StudentCandidate {
        u_id,
        u_name: name.into(),
        u_semester: Some(3),
        state: "Aprobado".into(),
        active_cursando: 0,
    }
}

#[tokio::test]
async fn student_batch_reports_assignments_made_before_a_failure() -> Result<()> {
    let api = Arc::new(RecordingApi {
        reject_user: Some(10),
        ..Default::default()
    });
    let (bus, mut rx) = NotificationBus::new(16);
    let service = AssignmentService::new(AppContext {
        api: api.clone(),
        notifier: Arc::new(bus),
        identity: Arc::new(StaticIdentity::new(User::new(1, Some(Role::Admin)))),
    });
    let board = Arc::new(Mutex::new(AssignmentBoard::new(4, Vec::new())));

    let batch = [approved(9, "Luis"), approved(10, "Marta"), approved(11, "Pedro")];
    let err = service.assign_students(&board, &subject(2), &batch).await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    {
        let board = board.lock().unwrap();
        assert_eq!(board.items().iter().map(|a| a.user_id).collect::<Vec<_>>(), vec![9]);
        assert_eq!(board.sync_state(), &SyncState::Synced);
    }
    assert_eq!(api.assigned.lock().unwrap().len(), 1);

    let notes = drain(&mut rx);
    let warning = notes
        .iter()
        .find(|n| n.kind == NotificationKind::Warning)
        .expect("partial batch warning");
    assert_eq!(warning.message, format!("{STUDENTS_PARTIALLY_ASSIGNED}: Luis"));

    let fresh = Arc::new(Mutex::new(AssignmentBoard::new(4, Vec::new())));
    let service = AssignmentService::new(context(Arc::new(RecordingApi::default()), User::new(1, Some(Role::Admin))));
    let applied = service
        .assign_students(&fresh, &subject(2), &[approved(9, "Luis"), approved(11, "Pedro")])
        .await?;
    assert_eq!(applied, vec![9, 11]);
    Ok(())
}

#[tokio::test]
async fn confirmed_tutor_assignment_stays_on_the_board() -> Result<()> {
    let api = Arc::new(RecordingApi::default());
    let service = AssignmentService::new(context(api.clone(), User::new(1, Some(Role::Admin))));
    let board = Arc::new(Mutex::new(AssignmentBoard::new(4, Vec::new())));

    let tutor = ApiUser {
        u_id: Some(2),
        u_name: Some("Ana".into()),
        u_role: Some(2),
        ..Default::default()
    };
    service.assign_tutor(&board, &subject(2), &tutor).await?;

    assert_eq!(board.lock().unwrap().tutor().map(|a| a.user_id), Some(2));
    assert_eq!(api.assigned.lock().unwrap()[0], AssignmentPayload::tutor(2, 4));

    service.remove(&board, 2).await?;
    assert!(board.lock().unwrap().items().is_empty());
    Ok(())
}

#[tokio::test]
async fn tutors_cannot_assign_students() -> Result<()> {
    let api = Arc::new(RecordingApi::default());
    let service = AssignmentService::new(context(api.clone(), User::new(2, Some(Role::Tutor))));
    let board = Arc::new(Mutex::new(AssignmentBoard::new(4, Vec::new())));

    let candidate = StudentCandidate {
        u_id: 9,
        u_name: "Luis".into(),
        u_semester: Some(2),
        state: "Aprobado".into(),
        active_cursando: 0,
    };
    let err = service.assign_students(&board, &subject(2), &[candidate]).await.unwrap_err();
    assert_eq!(err.user_message(), "No tienes permisos suficientes para asignar estudiantes");
    assert!(api.assigned.lock().unwrap().is_empty());
    Ok(())
}
