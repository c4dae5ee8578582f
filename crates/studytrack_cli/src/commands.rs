//! Command dispatch and plain-text rendering.

use crate::{
    ChecklistCommand, Cli, Command, CourseCommand, ExamCommand, ExerciseCommand, ResourceFields,
    ResourcesCommand, TopicCommand,
};
use log::info;
use studytrack_core::db::open_db;
use studytrack_core::model::resource::DESCRIPTION_PREVIEW_CHARS;
use studytrack_core::{
    can_edit, clamp_percent, default_log_level, exam_date_from_input, init_logging,
    normalize_exercise_count, truncate_description, AppConfig, AuthService, Countdown,
    CourseService, HttpResourceApi, KeyValueStore, ProgressStage, Resource, ResourceApi,
    ResourceCatalog, ResourceDraft, SqliteKeyValueStore, StudyStore, Topic, TopicChanges,
};

type CliResult = Result<(), String>;

pub fn run(cli: Cli) -> CliResult {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let config = AppConfig::from_env();
    let conn = open_db(&cli.db)
        .map_err(|err| format!("cannot open {}: {err}", cli.db.display()))?;
    let storage = SqliteKeyValueStore::new(&conn);
    let mut auth = AuthService::new(&storage, &config);
    info!(
        "event=cli_start module=cli status=ok authenticated={}",
        auth.is_authenticated()
    );

    match cli.command {
        Command::Login { email, password } => {
            let user = auth.login(&email, &password).map_err(|err| err.to_string())?;
            println!("Logged in as {}", user.email);
            Ok(())
        }
        Command::Logout => {
            auth.logout();
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => {
            match auth.current_user() {
                Some(user) => println!("{}", user.email),
                None => println!("guest"),
            }
            Ok(())
        }
        Command::Dashboard => {
            let store = StudyStore::open(&storage, &config, &auth);
            let course = CourseService::new(&storage, &config, store.identity());
            print_dashboard(&store, course.settings().course_full());
            Ok(())
        }
        Command::Topic(command) => {
            let mut store = StudyStore::open(&storage, &config, &auth);
            run_topic(&mut store, command)
        }
        Command::Exercise(command) => {
            let mut store = StudyStore::open(&storage, &config, &auth);
            run_exercise(&mut store, command)
        }
        Command::Checklist(command) => {
            let mut store = StudyStore::open(&storage, &config, &auth);
            run_checklist(&mut store, command)
        }
        Command::Exam(command) => {
            let mut store = StudyStore::open(&storage, &config, &auth);
            run_exam(&mut store, command)
        }
        Command::Course(command) => {
            let identity = auth.current_user().map(|user| user.email.clone());
            let mut course = CourseService::new(&storage, &config, identity.as_deref());
            run_course(&mut course, command);
            Ok(())
        }
        Command::Resources(command) => run_resources(&config, &auth, command),
    }
}

fn resolve_topic<'a, S: KeyValueStore>(
    store: &'a StudyStore<S>,
    reference: &str,
) -> Result<&'a Topic, String> {
    if let Some(topic) = store.topic(reference) {
        return Ok(topic);
    }
    reference
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| store.topics().get(index))
        .ok_or_else(|| format!("no topic matches `{reference}`"))
}

fn resolve_exercise<S: KeyValueStore>(
    store: &StudyStore<S>,
    topic_ref: &str,
    exercise_ref: &str,
) -> Result<(String, String), String> {
    let topic = resolve_topic(store, topic_ref)?;
    let exercise = topic
        .exercise(exercise_ref)
        .or_else(|| {
            exercise_ref
                .parse::<usize>()
                .ok()
                .and_then(|position| position.checked_sub(1))
                .and_then(|index| topic.exercises.get(index))
        })
        .ok_or_else(|| format!("no exercise matches `{exercise_ref}`"))?;
    Ok((topic.id.clone(), exercise.id.clone()))
}

fn run_topic<S: KeyValueStore>(store: &mut StudyStore<S>, command: TopicCommand) -> CliResult {
    match command {
        TopicCommand::Add {
            title,
            description,
            exercises,
        } => {
            let count = i64::from(normalize_exercise_count(exercises));
            let topic_id = store.add_topic(&title, &description, count);
            println!("Added topic {topic_id}");
        }
        TopicCommand::Update {
            topic,
            title,
            description,
            exercises,
        } => {
            let topic_id = resolve_topic(store, &topic)?.id.clone();
            let changes = TopicChanges {
                title,
                description,
                exercise_count: exercises.map(|raw| i64::from(normalize_exercise_count(raw))),
            };
            if changes.is_empty() {
                return Err(
                    "nothing to update; pass --title, --description or --exercises".to_string(),
                );
            }
            store.update_topic(&topic_id, changes);
            print_topic(store, &topic_id);
        }
        TopicCommand::Delete { topic } => {
            let topic_id = resolve_topic(store, &topic)?.id.clone();
            store.delete_topic(&topic_id);
            println!("Deleted topic {topic_id}");
        }
        TopicCommand::Show { topic } => {
            let topic_id = resolve_topic(store, &topic)?.id.clone();
            print_topic(store, &topic_id);
        }
        TopicCommand::Note { topic, note } => {
            let topic_id = resolve_topic(store, &topic)?.id.clone();
            store.update_topic_note(&topic_id, &note);
            println!("Saved note ({} chars)", note.chars().count());
        }
    }
    Ok(())
}

fn run_exercise<S: KeyValueStore>(
    store: &mut StudyStore<S>,
    command: ExerciseCommand,
) -> CliResult {
    match command {
        ExerciseCommand::Add { topic, title } => {
            let topic_id = resolve_topic(store, &topic)?.id.clone();
            store
                .add_exercise(&topic_id, &title)
                .ok_or("exercise title cannot be blank")?;
            print_topic(store, &topic_id);
        }
        ExerciseCommand::Rename {
            topic,
            exercise,
            title,
        } => {
            let (topic_id, exercise_id) = resolve_exercise(store, &topic, &exercise)?;
            if !store.update_exercise_title(&topic_id, &exercise_id, &title) {
                return Err("exercise title cannot be blank".to_string());
            }
            print_topic(store, &topic_id);
        }
        ExerciseCommand::Status {
            topic,
            exercise,
            status,
        } => {
            let (topic_id, exercise_id) = resolve_exercise(store, &topic, &exercise)?;
            store.update_exercise_status(&topic_id, &exercise_id, status);
            print_topic(store, &topic_id);
        }
    }
    Ok(())
}

fn run_checklist<S: KeyValueStore>(
    store: &mut StudyStore<S>,
    command: ChecklistCommand,
) -> CliResult {
    match command {
        ChecklistCommand::List => {}
        ChecklistCommand::Add { text } => {
            store
                .add_checklist_item(&text)
                .ok_or("checklist text cannot be blank")?;
        }
        ChecklistCommand::Toggle { item } => {
            let item_id = store
                .state()
                .checklist_item(&item)
                .map(|found| found.id.clone())
                .or_else(|| {
                    item.parse::<usize>()
                        .ok()
                        .and_then(|position| position.checked_sub(1))
                        .and_then(|index| store.checklist().get(index))
                        .map(|found| found.id.clone())
                })
                .ok_or_else(|| format!("no checklist item matches `{item}`"))?;
            store.toggle_checklist_item(&item_id);
        }
    }
    print_checklist(store);
    Ok(())
}

fn run_exam<S: KeyValueStore>(store: &mut StudyStore<S>, command: ExamCommand) -> CliResult {
    if let ExamCommand::Set { date } = command {
        let iso = exam_date_from_input(&date).ok_or_else(|| format!("invalid date `{date}`"))?;
        store.update_exam_date(&iso);
    }
    let countdown = Countdown::from_now(store.exam_date());
    println!("Exam date: {}", store.exam_date());
    println!(
        "{} days {} hours {} minutes",
        countdown.days, countdown.hours, countdown.minutes
    );
    println!("{}", countdown.message());
    print_checklist(store);
    Ok(())
}

fn run_course<S: KeyValueStore>(course: &mut CourseService<S>, command: CourseCommand) {
    match command {
        CourseCommand::Show => {}
        CourseCommand::Name { value } => course.set_course_name(&value),
        CourseCommand::Instance { value } => course.set_course_instance(&value),
        CourseCommand::Reset => course.reset(),
    }
    let settings = course.settings();
    println!("[{}] {}", settings.course_initial(), settings.course_full());
}

fn run_resources<S: KeyValueStore>(
    config: &AppConfig,
    auth: &AuthService<S>,
    command: ResourcesCommand,
) -> CliResult {
    let api = HttpResourceApi::new(config).map_err(|err| err.to_string())?;
    let mut catalog = ResourceCatalog::new(api);
    if !catalog.fetch() {
        return Err(catalog_error(&catalog));
    }
    let user = auth.current_user();

    match command {
        ResourcesCommand::List { mine } => {
            let email = if mine {
                user.map(|user| user.email.as_str()).unwrap_or_default()
            } else {
                ""
            };
            for resource in catalog.owned_by(email) {
                print_resource_line(resource);
            }
        }
        ResourcesCommand::Show { id } => {
            let resource = catalog
                .get(&id)
                .ok_or_else(|| format!("no resource with id `{id}`"))?;
            println!("{}\n{}\n{}", resource.title, resource.url, resource.description);
            let owner = if resource.owner_email.is_empty() {
                "unknown"
            } else {
                resource.owner_email.as_str()
            };
            println!("Owner: {owner}");
            if let Some(created_at) = &resource.created_at {
                println!("Created: {created_at}");
            }
        }
        ResourcesCommand::Add(fields) => {
            if user.is_none() {
                return Err("Please log in to create a resource.".to_string());
            }
            let created = catalog
                .create(&draft_from(fields), user)
                .ok_or_else(|| catalog_error(&catalog))?;
            println!("Created resource {}", created.id);
        }
        ResourcesCommand::Edit { id, fields } => {
            ensure_owner(&catalog, &id, auth)?;
            catalog
                .update(&id, &draft_from(fields))
                .ok_or_else(|| catalog_error(&catalog))?;
            println!("Updated resource {id}");
        }
        ResourcesCommand::Delete { id } => {
            ensure_owner(&catalog, &id, auth)?;
            if !catalog.delete(&id) {
                return Err(catalog_error(&catalog));
            }
            println!("Deleted resource {id}");
        }
    }
    Ok(())
}

fn ensure_owner<A, S>(catalog: &ResourceCatalog<A>, id: &str, auth: &AuthService<S>) -> CliResult
where
    A: ResourceApi,
    S: KeyValueStore,
{
    let resource = catalog
        .get(id)
        .ok_or_else(|| format!("no resource with id `{id}`"))?;
    if !can_edit(resource, auth.current_user()) {
        return Err("only the logged-in owner can change this resource".to_string());
    }
    Ok(())
}

fn catalog_error<A: ResourceApi>(catalog: &ResourceCatalog<A>) -> String {
    catalog.error().unwrap_or("resource request failed").to_string()
}

fn draft_from(fields: ResourceFields) -> ResourceDraft {
    ResourceDraft::new(fields.title, fields.description, fields.url)
}

fn print_dashboard<S: KeyValueStore>(store: &StudyStore<S>, course_full: String) {
    let countdown = Countdown::from_now(store.exam_date());
    println!("{course_full}");
    println!(
        "Overall progress: {}% {}",
        store.overall_progress(),
        progress_bar(f64::from(store.overall_progress()))
    );
    println!("Exam countdown: {}", countdown.summary());
    println!();
    if store.topics().is_empty() {
        println!("No topics yet. Add one with `studytrack topic add <title>`.");
    }
    for (index, topic) in store.topics().iter().enumerate() {
        let progress = store.topic_progress(&topic.id);
        let marker = match progress.stage() {
            ProgressStage::Done => "✔",
            ProgressStage::InProgress => "◐",
            ProgressStage::Idle => "○",
        };
        let label = if progress.total > 0 {
            format!("{} exercises", progress.fraction_label())
        } else {
            "No exercises".to_string()
        };
        println!(
            "{:>2}. {marker} {} [{}%] {label}",
            index + 1,
            topic.title,
            progress.percent
        );
    }
}

fn print_topic<S: KeyValueStore>(store: &StudyStore<S>, topic_id: &str) {
    let Some(topic) = store.topic(topic_id) else {
        return;
    };
    let progress = store.topic_progress(topic_id);
    println!("{} ({})", topic.title, topic.id);
    if !topic.description.is_empty() {
        println!("{}", topic.description);
    }
    println!(
        "Progress: {}% {} {} done",
        progress.percent,
        progress_bar(f64::from(progress.percent)),
        progress.fraction_label()
    );
    for (index, exercise) in topic.exercises.iter().enumerate() {
        println!(
            "{:>3}. [{}] {}",
            index + 1,
            exercise.status.as_str(),
            exercise.title
        );
    }
    if !topic.note.is_empty() {
        println!("Note:\n{}", topic.note);
    }
}

fn print_checklist<S: KeyValueStore>(store: &StudyStore<S>) {
    let progress = store.checklist_progress();
    println!("Checklist {} done", progress.fraction_label());
    for (index, item) in store.checklist().iter().enumerate() {
        let mark = if item.done { "x" } else { " " };
        println!("{:>3}. [{mark}] {}", index + 1, item.text);
    }
}

fn print_resource_line(resource: &Resource) {
    println!(
        "{}  {}  {}\n    {}",
        resource.id,
        resource.title,
        resource.url,
        truncate_description(&resource.description, DESCRIPTION_PREVIEW_CHARS)
    );
}

fn progress_bar(percent: f64) -> String {
    let filled = usize::from(clamp_percent(percent)) / 5;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(20 - filled))
}
