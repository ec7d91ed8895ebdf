//! User-facing text. The core never formats messages; the shell and TUI
//! look every string up here by key.

use clap::ValueEnum;

use crate::lifecycle::EditField;
use crate::models::SortKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    #[default]
    En,
    Es,
    Nb,
    Zh,
    Ro,
}

/// Shown before any language is chosen, so it lists every language at once.
pub const LANGUAGE_MENU: &str = "Select your language / Seleccione su idioma / Velg språk / 选择语言 / Selectați limba";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    AuthChoice,
    AuthInvalidChoice,
    PromptUsername,
    PromptPassword,
    RegisterSuccess,
    LoginSuccess,
    UsernameTaken,
    UserNotFound,
    LoginFailed,
    InvalidInput,
    HelpHint,
    PromptAction,
    InvalidAction,
    AvailableCommands,
    CmdAdd,
    CmdView,
    CmdEdit,
    CmdDelete,
    CmdCompleted,
    CmdHelp,
    CmdExit,
    PromptTaskName,
    PromptTaskDescription,
    SelectPriority,
    SelectCategory,
    SelectStatus,
    SelectSortKey,
    SelectEditField,
    EnterNewName,
    EnterNewDescription,
    EnterChoice,
    EnterTaskId,
    TaskAdded,
    TaskUpdated,
    TaskDeleted,
    TaskNotFound,
    NoTasks,
    NoCompletedTasks,
    ErrorSaving,
    ErrorUnexpected,
    Goodbye,
    AvailableTasks,
    CompletedTasks,
    FieldId,
    FieldName,
    FieldDescription,
    FieldPriority,
    FieldCategory,
    FieldStatus,
    FieldCreated,
    FieldDue,
    FieldCompleted,
    SortPriority,
    SortDueDate,
    SortCategory,
    SortStatus,
    SortCreated,
    NotSet,
    WelcomeTitle,
    WelcomeMessage,
    ConfirmStart,
    InvalidYesNo,
}

impl Language {
    pub const ALL: [Language; 5] = [Language::En, Language::Es, Language::Nb, Language::Zh, Language::Ro];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Nb => "nb",
            Language::Zh => "zh",
            Language::Ro => "ro",
        }
    }

    /// Name of the language in itself.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::Nb => "Norsk (Bokmål)",
            Language::Zh => "中文",
            Language::Ro => "Română",
        }
    }

    pub fn from_code(raw: &str) -> Option<Language> {
        let raw = raw.trim().to_lowercase();
        Language::ALL.into_iter().find(|l| l.code() == raw)
    }

    /// Looks up `key`, falling back to English when untranslated.
    pub fn text(self, key: MessageKey) -> &'static str {
        let translated = match self {
            Language::En => None,
            Language::Es => spanish(key),
            Language::Nb => norwegian(key),
            Language::Zh => chinese(key),
            Language::Ro => romanian(key),
        };
        translated.unwrap_or_else(|| english(key))
    }

    /// Looks up `key` and substitutes `arg` for the first `{}`.
    pub fn format(self, key: MessageKey, arg: impl std::fmt::Display) -> String {
        self.text(key).replacen("{}", &arg.to_string(), 1)
    }

    pub fn sort_label(self, key: SortKey) -> &'static str {
        self.text(match key {
            SortKey::Priority => MessageKey::SortPriority,
            SortKey::DueDate => MessageKey::SortDueDate,
            SortKey::Category => MessageKey::SortCategory,
            SortKey::Status => MessageKey::SortStatus,
            SortKey::CreatedAt => MessageKey::SortCreated,
        })
    }

    pub fn field_label(self, field: EditField) -> &'static str {
        self.text(match field {
            EditField::Name => MessageKey::FieldName,
            EditField::Description => MessageKey::FieldDescription,
            EditField::Status => MessageKey::FieldStatus,
            EditField::Priority => MessageKey::FieldPriority,
            EditField::Category => MessageKey::FieldCategory,
        })
    }
}

fn english(key: MessageKey) -> &'static str {
    use MessageKey::*;
    match key {
        AuthChoice => "Type 'login' (l) or 'register' (r): ",
        AuthInvalidChoice => "Invalid choice. Please type 'login' or 'register'.",
        PromptUsername => "Enter username: ",
        PromptPassword => "Enter password: ",
        RegisterSuccess => "Registration successful. Welcome, {}!",
        LoginSuccess => "Welcome back, {}!",
        UsernameTaken => "Username '{}' is already taken.",
        UserNotFound => "User '{}' does not exist.",
        LoginFailed => "Login failed: wrong username or password.",
        InvalidInput => "Invalid input: {}",
        HelpHint => "Type 'help' to see available commands.",
        PromptAction => "What do you want to do? ",
        InvalidAction => "Unknown command. Type 'help' for the list of commands.",
        AvailableCommands => "Available commands:",
        CmdAdd => "Add a new task",
        CmdView => "View all tasks",
        CmdEdit => "Edit a task",
        CmdDelete => "Complete and remove a task",
        CmdCompleted => "View completed tasks",
        CmdHelp => "Show this help message",
        CmdExit => "Exit the program",
        PromptTaskName => "Enter task name: ",
        PromptTaskDescription => "Enter task description: ",
        SelectPriority => "Priority levels:",
        SelectCategory => "Categories:",
        SelectStatus => "Statuses:",
        SelectSortKey => "Sort tasks by:",
        SelectEditField => "Which field do you want to edit?",
        EnterNewName => "Enter new name: ",
        EnterNewDescription => "Enter new description: ",
        EnterChoice => "Enter your choice (1-{}): ",
        EnterTaskId => "Enter the task ID (1-{}): ",
        TaskAdded => "Task {} added.",
        TaskUpdated => "Task {} updated.",
        TaskDeleted => "Task '{}' moved to completed tasks.",
        TaskNotFound => "Task {} not found.",
        NoTasks => "You have no tasks.",
        NoCompletedTasks => "You have no completed tasks.",
        ErrorSaving => "Could not save changes: {}",
        ErrorUnexpected => "Unexpected error: {}",
        Goodbye => "Goodbye!",
        AvailableTasks => "Your tasks",
        CompletedTasks => "Completed tasks",
        FieldId => "ID",
        FieldName => "Name",
        FieldDescription => "Description",
        FieldPriority => "Priority",
        FieldCategory => "Category",
        FieldStatus => "Status",
        FieldCreated => "Created",
        FieldDue => "Due",
        FieldCompleted => "Completed",
        SortPriority => "Priority",
        SortDueDate => "Due date",
        SortCategory => "Category",
        SortStatus => "Status",
        SortCreated => "Creation date",
        NotSet => "Not set",
        WelcomeTitle => "=== Task Keeper ===",
        WelcomeMessage => "Keep track of your tasks from the terminal.",
        ConfirmStart => "Do you want to start? (y/n): ",
        InvalidYesNo => "Please answer 'y' or 'n'.",
    }
}

fn spanish(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    let s = match key {
        AuthChoice => "Escriba 'login' (l) o 'register' (r): ",
        AuthInvalidChoice => "Opción inválida. Escriba 'login' o 'register'.",
        PromptUsername => "Ingrese nombre de usuario: ",
        PromptPassword => "Ingrese contraseña: ",
        RegisterSuccess => "Registro exitoso. ¡Bienvenido, {}!",
        LoginSuccess => "¡Bienvenido de nuevo, {}!",
        UsernameTaken => "El nombre de usuario '{}' ya está en uso.",
        UserNotFound => "El usuario '{}' no existe.",
        LoginFailed => "Inicio de sesión fallido: usuario o contraseña incorrectos.",
        InvalidInput => "Entrada inválida: {}",
        HelpHint => "Escriba 'help' para ver los comandos disponibles.",
        PromptAction => "¿Qué desea hacer? ",
        InvalidAction => "Comando desconocido. Escriba 'help' para ver la lista.",
        AvailableCommands => "Comandos disponibles:",
        CmdAdd => "Agregar una tarea",
        CmdView => "Ver todas las tareas",
        CmdEdit => "Editar una tarea",
        CmdDelete => "Completar y quitar una tarea",
        CmdCompleted => "Ver tareas completadas",
        CmdHelp => "Mostrar esta ayuda",
        CmdExit => "Salir del programa",
        PromptTaskName => "Ingrese el nombre de la tarea: ",
        PromptTaskDescription => "Ingrese la descripción de la tarea: ",
        SelectPriority => "Niveles de prioridad:",
        SelectCategory => "Categorías:",
        SelectStatus => "Estados:",
        SelectSortKey => "Ordenar tareas por:",
        SelectEditField => "¿Qué campo desea editar?",
        EnterNewName => "Ingrese el nuevo nombre: ",
        EnterNewDescription => "Ingrese la nueva descripción: ",
        EnterChoice => "Ingrese su opción (1-{}): ",
        EnterTaskId => "Ingrese el ID de la tarea (1-{}): ",
        TaskAdded => "Tarea {} agregada.",
        TaskUpdated => "Tarea {} actualizada.",
        TaskDeleted => "Tarea '{}' movida a completadas.",
        TaskNotFound => "Tarea {} no encontrada.",
        NoTasks => "No tiene tareas.",
        NoCompletedTasks => "No tiene tareas completadas.",
        ErrorSaving => "No se pudieron guardar los cambios: {}",
        ErrorUnexpected => "Error inesperado: {}",
        Goodbye => "¡Adiós!",
        AvailableTasks => "Sus tareas",
        CompletedTasks => "Tareas completadas",
        FieldName => "Nombre",
        FieldDescription => "Descripción",
        FieldPriority => "Prioridad",
        FieldCategory => "Categoría",
        FieldStatus => "Estado",
        FieldCreated => "Creada",
        FieldDue => "Vence",
        FieldCompleted => "Completada",
        SortPriority => "Prioridad",
        SortDueDate => "Fecha de vencimiento",
        SortCategory => "Categoría",
        SortStatus => "Estado",
        SortCreated => "Fecha de creación",
        NotSet => "Sin definir",
        WelcomeMessage => "Administre sus tareas desde la terminal.",
        ConfirmStart => "¿Desea comenzar? (s/n): ",
        InvalidYesNo => "Responda 's' o 'n'.",
        _ => return None,
    };
    Some(s)
}

fn norwegian(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    let s = match key {
        AuthChoice => "Skriv 'login' (l) eller 'register' (r): ",
        PromptUsername => "Skriv inn brukernavn: ",
        PromptPassword => "Skriv inn passord: ",
        RegisterSuccess => "Registrering vellykket. Velkommen, {}!",
        LoginSuccess => "Velkommen tilbake, {}!",
        UsernameTaken => "Brukernavnet '{}' er allerede tatt.",
        UserNotFound => "Brukeren '{}' finnes ikke.",
        LoginFailed => "Innlogging mislyktes: feil brukernavn eller passord.",
        InvalidInput => "Ugyldig inndata: {}",
        PromptAction => "Hva vil du gjøre? ",
        InvalidAction => "Ukjent kommando. Skriv 'help' for en liste.",
        AvailableCommands => "Tilgjengelige kommandoer:",
        PromptTaskName => "Skriv inn oppgavenavn: ",
        PromptTaskDescription => "Skriv inn beskrivelse: ",
        EnterTaskId => "Skriv inn oppgave-ID (1-{}): ",
        TaskAdded => "Oppgave {} lagt til.",
        TaskUpdated => "Oppgave {} oppdatert.",
        TaskDeleted => "Oppgave '{}' flyttet til fullførte.",
        TaskNotFound => "Fant ikke oppgave {}.",
        NoTasks => "Du har ingen oppgaver.",
        Goodbye => "Ha det!",
        AvailableTasks => "Dine oppgaver",
        FieldName => "Navn",
        FieldDescription => "Beskrivelse",
        FieldPriority => "Prioritet",
        FieldCategory => "Kategori",
        FieldDue => "Frist",
        WelcomeMessage => "Hold oversikt over oppgavene dine fra terminalen.",
        ConfirmStart => "Vil du starte? (j/n): ",
        InvalidYesNo => "Svar 'j' eller 'n'.",
        _ => return None,
    };
    Some(s)
}

fn chinese(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    let s = match key {
        AuthChoice => "输入 'login' (l) 登录或 'register' (r) 注册: ",
        AuthInvalidChoice => "无效的选择。请输入 'login' 或 'register'。",
        PromptUsername => "请输入用户名: ",
        PromptPassword => "请输入密码: ",
        RegisterSuccess => "注册成功。欢迎, {}!",
        LoginSuccess => "欢迎回来, {}!",
        UsernameTaken => "用户名 '{}' 已被占用。",
        UserNotFound => "用户 '{}' 不存在。",
        LoginFailed => "登录失败: 用户名或密码错误。",
        InvalidInput => "无效输入: {}",
        HelpHint => "输入 'help' 查看可用命令。",
        PromptAction => "您想做什么? ",
        InvalidAction => "未知命令。输入 'help' 查看命令列表。",
        AvailableCommands => "可用命令:",
        PromptTaskName => "请输入任务名称: ",
        PromptTaskDescription => "请输入任务描述: ",
        SelectPriority => "优先级:",
        SelectCategory => "类别:",
        SelectStatus => "状态:",
        TaskAdded => "任务 {} 已添加。",
        TaskUpdated => "任务 {} 已更新。",
        TaskDeleted => "任务 '{}' 已移至已完成任务。",
        TaskNotFound => "未找到任务 {}。",
        NoTasks => "您没有任务。",
        Goodbye => "再见!",
        AvailableTasks => "您的任务",
        CompletedTasks => "已完成的任务",
        FieldName => "名称",
        FieldDescription => "描述",
        FieldPriority => "优先级",
        FieldCategory => "类别",
        FieldStatus => "状态",
        WelcomeMessage => "在终端中管理您的任务。",
        ConfirmStart => "是否开始? (是/否): ",
        InvalidYesNo => "请回答 '是' 或 '否'。",
        _ => return None,
    };
    Some(s)
}

fn romanian(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    let s = match key {
        AuthChoice => "Tastați 'login' (l) sau 'register' (r): ",
        PromptUsername => "Introduceți numele de utilizator: ",
        PromptPassword => "Introduceți parola: ",
        RegisterSuccess => "Înregistrare reușită. Bun venit, {}!",
        LoginSuccess => "Bine ați revenit, {}!",
        UsernameTaken => "Numele de utilizator '{}' este deja folosit.",
        UserNotFound => "Utilizatorul '{}' nu există.",
        LoginFailed => "Autentificare eșuată: nume de utilizator sau parolă greșită.",
        InvalidInput => "Date invalide: {}",
        PromptAction => "Ce doriți să faceți? ",
        InvalidAction => "Comandă necunoscută. Tastați 'help' pentru listă.",
        AvailableCommands => "Comenzi disponibile:",
        PromptTaskName => "Introduceți numele sarcinii: ",
        PromptTaskDescription => "Introduceți descrierea sarcinii: ",
        TaskAdded => "Sarcina {} a fost adăugată.",
        TaskUpdated => "Sarcina {} a fost actualizată.",
        TaskDeleted => "Sarcina '{}' a fost mutată la sarcinile finalizate.",
        TaskNotFound => "Sarcina {} nu a fost găsită.",
        NoTasks => "Nu aveți sarcini.",
        Goodbye => "La revedere!",
        AvailableTasks => "Sarcinile dumneavoastră",
        FieldName => "Nume",
        FieldDescription => "Descriere",
        FieldPriority => "Prioritate",
        FieldCategory => "Categorie",
        WelcomeMessage => "Gestionați-vă sarcinile din terminal.",
        ConfirmStart => "Doriți să începeți? (d/n): ",
        InvalidYesNo => "Răspundeți cu 'd' sau 'n'.",
        _ => return None,
    };
    Some(s)
}
